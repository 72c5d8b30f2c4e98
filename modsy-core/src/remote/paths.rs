//! Store paths the controller reads and writes
//!
//! These names are the wire contract with the mobile app that publishes
//! commands and looks.

use core::fmt::Write;

use heapless::String;

use crate::state::LookIndex;

/// Pending look command: `{ "look": "1".."4", "status": ... }`
pub const LOOK_COMMAND: &str = "/comandoLook";

/// Status field of the look command
pub const LOOK_COMMAND_STATUS: &str = "/comandoLook/status";

/// Pending single-section command: `{ "secao": ..., "status": ... }`
pub const SECTION_COMMAND: &str = "/comandoGirar";

/// Status field of the section command
pub const SECTION_COMMAND_STATUS: &str = "/comandoGirar/status";

/// Longest garment identifier accepted in a path
pub const MAX_GARMENT_ID_LEN: usize = 64;

/// Capacity for any generated path
pub const MAX_PATH_LEN: usize = 96;

/// Path type used for generated paths
pub type Path = String<MAX_PATH_LEN>;

/// Path of a look's garment assignment: `/posicoesRoupas/look{N}`
pub fn look(index: LookIndex) -> Path {
    let mut path = Path::new();
    // Fits: fixed prefix plus one digit
    let _ = write!(path, "/posicoesRoupas/look{}", index.get());
    path
}

/// Path of a garment's slot: `/mapaPecas/{id}/posicao`
///
/// `None` if the identifier is empty, too long, or contains characters that
/// would change the path's shape.
pub fn garment_position(garment_id: &str) -> Option<Path> {
    if !is_valid_key(garment_id) {
        return None;
    }
    let mut path = Path::new();
    write!(path, "/mapaPecas/{}/posicao", garment_id).ok()?;
    Some(path)
}

/// Key segment rules of the store: no separators or reserved characters
fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= MAX_GARMENT_ID_LEN
        && !key
            .chars()
            .any(|c| matches!(c, '/' | '.' | '#' | '$' | '[' | ']') || c.is_control())
}
