pub mod unique_id;

pub trait ResultOkMap<T> {
    /// This maps a function that returns a result to a Result<Option<U>, E>
    fn ok_map<F, E, U>(self, f: F) -> Result<Option<U>, E>
    where
        F: FnOnce(T) -> Result<U, E>;
}

impl<T> ResultOkMap<T> for Option<T> {
    fn ok_map<F, E, U>(self, f: F) -> Result<Option<U>, E>
    where
        F: FnOnce(T) -> Result<U, E>,
    {
        self.map(f).map_or(Ok(None), |v| v.map(Some))
    }
}
