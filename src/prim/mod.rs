// Copyright 2025 Seth Pendergrass. See LICENSE.

//! Primitive types for representing multimedia files, the groups they form,
//! and the work planned for them.

mod conv;
mod group;
mod media;
mod metadata;
mod operation;
mod report;

pub use conv::*;
pub use group::*;
pub use media::*;
pub use metadata::*;
pub use operation::*;
pub use report::*;
