mod lookups;

pub use lookups::LookupRepository;
