use derive_new::new;
use serde::{Deserialize, Serialize};

pub use video::*;

mod video;
