use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::reader::ReadError;

/// Failures of the read, render and save pipeline driven by the binary.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Image must be at least 1x1 pixels, found {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Cannot open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("Cannot start render threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Cannot serialize scene: {0}")]
    Dump(#[from] serde_json::Error),

    #[error("Cannot write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[test]
fn read_errors_keep_their_line() {
    let err = RenderError::from(ReadError::PrematureEof { line: 3 });

    assert_eq!(err.to_string(), "Line 3: Premature end-of-file");
}

#[test]
fn messages_name_the_file() {
    let err = RenderError::Open {
        path: PathBuf::from("scene.json"),
        source: io::Error::new(io::ErrorKind::NotFound, "not found"),
    };

    assert_eq!(err.to_string(), "Cannot open 'scene.json': not found");

    let err = RenderError::InvalidDimensions { width: 0, height: 10 };
    assert_eq!(err.to_string(), "Image must be at least 1x1 pixels, found 0x10");
}
