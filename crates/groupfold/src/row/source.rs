use crate::row::Tuple;

///
/// RowSource
///
/// Finite, ordered, single-pass sequence of rows. Each pull may fail; a
/// failure aborts the transform that is consuming the source.
///
/// Every `Iterator<Item = Result<Tuple, E>>` is a row source, so query
/// cursors and in-memory vectors plug in without adapters.
///

pub trait RowSource {
    type Error: Into<Box<dyn std::error::Error + Send + Sync>>;

    /// Pull the next row, `None` once the source is exhausted.
    fn next_row(&mut self) -> Option<Result<Tuple, Self::Error>>;
}

impl<I, E> RowSource for I
where
    I: Iterator<Item = Result<Tuple, E>>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Error = E;

    fn next_row(&mut self) -> Option<Result<Tuple, E>> {
        self.next()
    }
}
