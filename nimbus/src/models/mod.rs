mod forecast;
mod lookup;

pub use forecast::*;
pub use lookup::*;
