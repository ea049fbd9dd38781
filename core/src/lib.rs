mod sig;
pub use sig::{Buf, ConstBuf, Map, Sig, SigCtx, SigT, Zip};
mod var;
pub use var::{SigVar, Var};
