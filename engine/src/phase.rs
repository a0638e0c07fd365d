use strum::{Display, EnumCount, EnumIter, IntoEnumIterator, IntoStaticStr};

/// Transaction phases, in the order a transaction passes through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, IntoStaticStr, EnumIter, EnumCount)]
pub enum Phase {
    #[strum(serialize = "Request Header")]
    RequestHeader,
    #[strum(serialize = "Request Body")]
    RequestBody,
    #[strum(serialize = "Response Header")]
    ResponseHeader,
    #[strum(serialize = "Response Body")]
    ResponseBody,
    #[strum(serialize = "Post Process")]
    PostProcess,
}

impl Phase {
    /// Position in the phase order, starting at zero.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn all() -> impl Iterator<Item = Phase> {
        Self::iter()
    }

    /// Phase that follows this one, `None` after [`Phase::PostProcess`].
    pub fn next(self) -> Option<Phase> {
        Self::iter().nth(self.index() + 1)
    }
}
