pub mod haksaeng_model;

pub use haksaeng_model::{
    Haksaeng, HaksaengCreate, HaksaengFields, HaksaengQuery, HaksaengStats, HaksaengUpdate,
    SchoolLevel,
};
