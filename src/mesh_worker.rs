//! Parallel terrace generation worker pool.
//!
//! A height field is split into square chunks of cells. Worker tasks mesh
//! chunks with pure Rust computation and send results back over crossbeam
//! channels.

use crossbeam::channel::{bounded, Receiver, Sender};
use std::collections::HashSet;
use std::ops::Range;
use std::sync::Arc;

use crate::debug_log::debug_log;
use crate::error::{TerraceError, TerraceResult};
use crate::height_field::HeightField;
use crate::mesh_extraction::{extract_region, ExtractedMesh};
use crate::shared_params::TerraceParams;

/// Fraction of detected CPUs to use for mesh worker threads (numerator).
const THREAD_CPU_NUMERATOR: usize = 3;
/// Fraction of detected CPUs to use for mesh worker threads (denominator).
const THREAD_CPU_DENOMINATOR: usize = 4;
/// Minimum number of mesh worker threads.
const MIN_WORKER_THREADS: usize = 2;
/// Minimum batch size for processing mesh requests.
const MIN_BATCH_SIZE: usize = 16;
/// Default channel capacity for mesh request/result channels.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Chunk position in chunk units (not cells).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub x: usize,
    pub z: usize,
}

impl ChunkCoord {
    pub const fn new(x: usize, z: usize) -> Self {
        Self { x, z }
    }

    /// Cell ranges covered by this chunk, clipped to the field.
    pub fn cell_ranges(
        &self,
        field: &HeightField,
        chunk_cells: usize,
    ) -> (Range<usize>, Range<usize>) {
        let x0 = self.x * chunk_cells;
        let z0 = self.z * chunk_cells;
        (
            x0..(x0 + chunk_cells).min(field.cells_x()),
            z0..(z0 + chunk_cells).min(field.cells_z()),
        )
    }

    /// Row-major sort key.
    pub fn row_major(&self) -> (usize, usize) {
        (self.z, self.x)
    }
}

/// Every chunk coordinate needed to cover `field`, row-major.
pub fn chunk_coords(field: &HeightField, chunk_cells: usize) -> TerraceResult<Vec<ChunkCoord>> {
    if chunk_cells == 0 {
        return Err(TerraceError::InvalidChunkSize);
    }
    let chunks_x = field.cells_x().div_ceil(chunk_cells);
    let chunks_z = field.cells_z().div_ceil(chunk_cells);
    Ok((0..chunks_z)
        .flat_map(|z| (0..chunks_x).map(move |x| ChunkCoord::new(x, z)))
        .collect())
}

/// Request sent from the caller to workers
pub struct ChunkRequest {
    pub coord: ChunkCoord,
    pub field: Arc<HeightField>,
    pub params: TerraceParams,
    /// Chunk edge length in cells.
    pub chunk_cells: usize,
}

/// Result sent back from a worker
#[derive(Debug)]
pub struct ChunkResult {
    pub coord: ChunkCoord,
    pub mesh: TerraceResult<ExtractedMesh>,
}

/// Worker pool for parallel terrace generation
///
/// Owns a dedicated rayon pool sized at construction. Requests queued through
/// [`TerraceWorkerPool::request_sender`] are meshed by
/// [`TerraceWorkerPool::process_requests`]; [`TerraceWorkerPool::mesh_field`]
/// runs on its own channel and never touches that queue.
pub struct TerraceWorkerPool {
    pool: rayon::ThreadPool,
    channel_capacity: usize,
    request_tx: Sender<ChunkRequest>,
    request_rx: Receiver<ChunkRequest>,
    result_tx: Sender<ChunkResult>,
    result_rx: Receiver<ChunkResult>,
}

impl TerraceWorkerPool {
    /// `num_threads == 0` picks three quarters of the detected CPUs.
    pub fn new(num_threads: usize, channel_capacity: usize) -> TerraceResult<Self> {
        let detected_cpus = num_cpus::get();
        let threads = if num_threads == 0 {
            ((detected_cpus * THREAD_CPU_NUMERATOR) / THREAD_CPU_DENOMINATOR)
                .max(MIN_WORKER_THREADS)
        } else {
            num_threads
        };
        let channel_capacity = channel_capacity.max(1);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("terrace-worker-{i}"))
            .build()
            .map_err(|_| TerraceError::WorkerPoolBuild { threads })?;

        let (request_tx, request_rx) = bounded(channel_capacity);
        let (result_tx, result_rx) = bounded(channel_capacity);

        Ok(Self {
            pool,
            channel_capacity,
            request_tx,
            request_rx,
            result_tx,
            result_rx,
        })
    }

    pub fn with_default_threads() -> TerraceResult<Self> {
        Self::new(0, DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn request_sender(&self) -> Sender<ChunkRequest> {
        self.request_tx.clone()
    }

    pub fn result_receiver(&self) -> Receiver<ChunkResult> {
        self.result_rx.clone()
    }

    fn batch_size(&self) -> usize {
        self.pool
            .current_num_threads()
            .max(MIN_BATCH_SIZE)
            .min(self.channel_capacity)
    }

    /// Drain one batch of pending requests and mesh it in parallel.
    /// Returns how many requests were processed.
    pub fn process_requests(&self) -> usize {
        let batch: Vec<ChunkRequest> = self
            .request_rx
            .try_iter()
            .take(self.batch_size())
            .collect();
        self.run_batch(batch, &self.result_tx)
    }

    fn run_batch(&self, batch: Vec<ChunkRequest>, results: &Sender<ChunkResult>) -> usize {
        let processed = batch.len();
        if processed == 0 {
            return 0;
        }

        self.pool.scope(|scope| {
            for request in batch {
                let tx = results.clone();
                scope.spawn(move |_| {
                    let result = generate_mesh_for_request(&request);
                    if tx.try_send(result).is_err() {
                        debug_log(&format!(
                            "[run_batch] result channel full, dropped chunk ({}, {})",
                            request.coord.x, request.coord.z
                        ));
                    }
                });
            }
        });

        processed
    }

    /// Mesh a whole field chunk by chunk and collect every result.
    ///
    /// Results arrive in completion order; see
    /// [`crate::mesh_postprocess::MeshPostProcessor::merge_chunks`] for the
    /// ordered merge. Fails with [`TerraceError::MissingChunks`] unless every
    /// chunk of `field` came back.
    pub fn mesh_field(
        &self,
        field: Arc<HeightField>,
        params: TerraceParams,
        chunk_cells: usize,
    ) -> TerraceResult<Vec<ChunkResult>> {
        let coords = chunk_coords(&field, chunk_cells)?;
        let batch_size = self.batch_size();
        // One slot per in-flight chunk, so no result is ever dropped.
        let (result_tx, result_rx) = bounded(batch_size);
        let mut results = Vec::with_capacity(coords.len());

        for batch in coords.chunks(batch_size) {
            let requests = batch
                .iter()
                .map(|&coord| ChunkRequest {
                    coord,
                    field: Arc::clone(&field),
                    params,
                    chunk_cells,
                })
                .collect();
            self.run_batch(requests, &result_tx);
            results.extend(result_rx.try_iter());
        }

        let received: HashSet<ChunkCoord> = results.iter().map(|r| r.coord).collect();
        let missing = coords.iter().filter(|c| !received.contains(*c)).count();

        if cfg!(debug_assertions) {
            debug_log(&format!(
                "[mesh_field] {} chunks of {} cells on {} threads: received {}",
                coords.len(),
                chunk_cells,
                self.thread_count(),
                results.len()
            ));
        }
        if missing > 0 {
            return Err(TerraceError::MissingChunks {
                missing,
                expected: coords.len(),
            });
        }
        Ok(results)
    }

    /// Threads actually running in the owned pool.
    pub fn thread_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn shutdown(&mut self) {
        while self.request_rx.try_recv().is_ok() {}
        while self.result_rx.try_recv().is_ok() {}
    }
}

fn generate_mesh_for_request(request: &ChunkRequest) -> ChunkResult {
    let (xs, zs) = request.coord.cell_ranges(&request.field, request.chunk_cells);
    ChunkResult {
        coord: request.coord,
        mesh: extract_region(&request.field, xs, zs, &request.params),
    }
}
