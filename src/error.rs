/// Invalid flags, bad period text, export write failures.
pub const EXIT_INPUT: u8 = 2;
/// The fetched data could not be processed.
pub const EXIT_PROCESS: u8 = 3;
/// Network/source or terminal failures.
pub const EXIT_EXTERNAL: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// The data source could not be reached or returned an error status.
    pub fn fetch(cause: impl std::fmt::Display) -> Self {
        Self::new(
            EXIT_EXTERNAL,
            format!(
                "Could not load the spreadsheet data. Check that the link is correct and that the sheet is published to the web. ({cause})"
            ),
        )
    }

    /// The data arrived but could not be turned into a dashboard.
    pub fn process(cause: impl std::fmt::Display) -> Self {
        Self::new(EXIT_PROCESS, format!("Failed to process data: {cause}"))
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
