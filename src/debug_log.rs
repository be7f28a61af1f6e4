//! Debug logging for mesh generation
//!
//! Writes to `debug_terraced.log` in the working directory.
//! The log file is recreated on each `init_debug_log()` call; until then every
//! `debug_log` call is a no-op.

use std::fs::File;
use std::io::Write;
use std::sync::Mutex;

lazy_static::lazy_static! {
    static ref DEBUG_LOG: Mutex<Option<File>> = Mutex::new(None);
}

/// Log a debug message to the terraced mesh debug log file
pub fn debug_log(msg: &str) {
    if let Ok(mut guard) = DEBUG_LOG.lock() {
        if let Some(ref mut file) = *guard {
            let _ = writeln!(file, "{}", msg);
            let _ = file.flush();
        }
    }
}

/// Initialize the debug log file (overwrites any existing log)
pub fn init_debug_log() {
    if let Ok(mut guard) = DEBUG_LOG.lock() {
        *guard = File::create("debug_terraced.log").ok();
        if let Some(ref mut file) = *guard {
            let _ = writeln!(file, "=== PIXY TERRACED DEBUG LOG ===");
            let _ = writeln!(file, "Timestamp: {:?}", std::time::SystemTime::now());
            let _ = writeln!(file);
        }
    }
}

/// Statistics about normals in a mesh
#[derive(Debug)]
pub struct NormalStats {
    pub min_len: f32,
    pub max_len: f32,
    pub degenerate_count: usize,
    /// Normals pointing mostly up (caps).
    pub up_count: usize,
    /// Normals with no vertical component (risers).
    pub horizontal_count: usize,
}

/// Compute statistics about normal vectors
/// A normal is considered degenerate if its length is not close to 1.0
pub fn compute_normal_stats(normals: &[[f32; 3]]) -> NormalStats {
    let mut min_len = f32::MAX;
    let mut max_len = f32::MIN;
    let mut degenerate_count = 0;
    let mut up_count = 0;
    let mut horizontal_count = 0;

    for n in normals {
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        min_len = min_len.min(len);
        max_len = max_len.max(len);

        if !(0.99..=1.01).contains(&len) {
            degenerate_count += 1;
            continue;
        }
        if n[1] > 0.99 {
            up_count += 1;
        } else if n[1].abs() < 1e-3 {
            horizontal_count += 1;
        }
    }

    if normals.is_empty() {
        min_len = 0.0;
        max_len = 0.0;
    }

    NormalStats {
        min_len,
        max_len,
        degenerate_count,
        up_count,
        horizontal_count,
    }
}

/// Count vertices that appear at identical positions (within epsilon)
/// Returns the number of duplicate position groups found
pub fn count_duplicate_positions(vertices: &[[f32; 3]], epsilon: f32) -> usize {
    use std::collections::HashMap;

    // Quantize positions to grid cells for fast lookup
    let scale = 1.0 / epsilon;
    let mut position_counts: HashMap<(i32, i32, i32), usize> = HashMap::new();

    for v in vertices {
        let key = (
            (v[0] * scale).round() as i32,
            (v[1] * scale).round() as i32,
            (v[2] * scale).round() as i32,
        );
        *position_counts.entry(key).or_insert(0) += 1;
    }

    position_counts.values().filter(|&&count| count > 1).count()
}
