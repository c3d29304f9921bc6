#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Ron(ron::Error),
    Json(serde_json::Error),
    /// The fleet already holds [`crate::fleet::MAX_AVATARS`] avatars.
    FleetFull,
    UnknownAvatar(String),
    DuplicateAvatar(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self { Self::Io(err) }
}

impl From<ron::Error> for Error {
    fn from(err: ron::Error) -> Self { Self::Ron(err) }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self { Self::Json(err) }
}
