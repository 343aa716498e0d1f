pub mod collation;
pub mod shaper;

pub use collation::{
    CaseInsensitiveCollator, LocaleCollator, NameCollator, NoFilter, UsernameFilter,
};
pub use shaper::{ShapedView, Shaper};
