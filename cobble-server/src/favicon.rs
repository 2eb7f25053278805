use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

///
/// The file name the server looks for in its working directory.
pub const FAVICON_PATH: &str = "favicon.png";

///
/// The largest favicon the status response will carry.
pub const MAX_FAVICON_BYTES: usize = 8 * 1024;

///
/// The media-type prefix for the status document's `favicon` field.
const DATA_URI_PREFIX: &str = "data:image/png;base64,";

///
/// Loads the favicon at `path` as a `data:image/png;base64,` URI for the status response.
///
/// Anything that prevents that — the file being missing, unreadable, or over
/// [`MAX_FAVICON_BYTES`] — makes the favicon silently absent.
#[must_use]
pub fn load(path: &Path) -> Option<String> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!(?path, %err, "no favicon");
            return None;
        }
    };

    if bytes.len() > MAX_FAVICON_BYTES {
        tracing::warn!(
            ?path,
            size = bytes.len(),
            "favicon exceeds {MAX_FAVICON_BYTES} bytes, ignoring"
        );
        return None;
    }

    let mut uri = String::from(DATA_URI_PREFIX);
    STANDARD.encode_string(&bytes, &mut uri);

    Some(uri)
}
