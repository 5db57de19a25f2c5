use super::{ApiError, Transport};

/// Ask a running JOSM to load and zoom to `url` via its remote control.
///
/// JOSM answers a successful command with the plain body `ok`; any other
/// body means the command was refused.
pub fn open_in_josm<T: Transport>(transport: &T, url: &str) -> Result<(), ApiError> {
    let response = transport
        .get(url, &[])
        .inspect_err(|e| log::warn!("JOSM remote control unreachable: {}", e))?
        .ensure_success(url)?;

    if response.body != "ok" {
        return Err(ApiError::Editor(response.body));
    }

    Ok(())
}
