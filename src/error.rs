/// Kinds of error raised by the binary core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    OutOfRange,
    InvalidValue,
    Overflow,
    Underflow,
    DivisionByZero,
    InvalidSize,
    InvalidHex,
    NotEnoughData,
    NonMinimalEncoding,
    InvalidShape,
    InvalidPosition,
    Other,
}


/// Shortcut for converting boolean check into error.
#[macro_export]
macro_rules! validate {
    ($check:expr, $kind:ident) => (
        if $check {
            Ok::<(), $crate::error::Error>(())
        } else {
            Err($crate::error::ErrorKind::$kind.into())
        }
    )
}


/// Error structure. It supports converting into `std::io::Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}


impl Error {
    /// Create a new error instance.
    pub fn new(kind: ErrorKind, message: String) -> Self {
        Self { kind, message }
    }

    /// Get kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}


impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}


impl std::error::Error for Error {}


impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        let message = format!("{:?}", kind);
        Error::new(kind, message)
    }
}


impl From<Error> for std::io::Error {
    fn from(error: Error) -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::Other, error.to_string())
    }
}


impl From<ErrorKind> for std::io::Error {
    fn from(kind: ErrorKind) -> std::io::Error {
        let error = Error::from(kind);
        error.into()
    }
}
