pub type Result<T, LCDER, SDER> = core::result::Result<T, Error<LCDER, SDER>>;

#[derive(Debug, PartialEq)]
pub enum Error<LCD, SD> {
    // Hw LCD error
    Lcd(LCD),
    // Touch controller did not start
    Touch,
    // Storage could not be mounted
    StorageUnavailable(SD),
    // Output file could not be created or reopened
    FileOpen(SD),
    // Write or close on an open file
    Storage(SD),
    // Chunk buffer
    BufferWrite,
}

impl<LCD, SD> Error<LCD, SD> {
    /// Storage failures abort the export but leave the painter usable.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Lcd(_) | Error::Touch)
    }
}
