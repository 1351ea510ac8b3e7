//! Re-imports for convenience
#[doc(no_inline)]
pub use crate::dist::*;
#[doc(no_inline)]
pub use crate::linalg::{Cholesky, Matrix};
#[doc(no_inline)]
pub use crate::process::gaussian::kernel::*;
#[doc(no_inline)]
pub use crate::process::gaussian::*;
#[doc(no_inline)]
pub use crate::traits::*;
