//! Coverage classes and the regions they are assigned to.

pub mod class;
pub mod lookup;
pub mod partition;
pub mod region;

pub use class::Class;
pub use lookup::Lookup;
pub use region::Region;
