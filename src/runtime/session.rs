/// Async driver for one page session
///
/// A `Session` owns the surface, the sampler and the hover machine, and
/// runs them on a single task: pointer events and fetch completions are
/// processed one at a time, so the metadata cache is never shared.
/// Fetches are spawned on tokio and report back over a channel; nothing
/// is cancelled, stale completions are simply discarded by the machine.
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::debug;

use super::hover::{FetchRequest, HoverMachine, HoverState};
use super::latest::Ticket;
use super::sampler::{hit_test, PointerSampler, Sample};
use super::source::MetadataSource;
use super::surface::{render_grid, CellMaps, GridSurface, Overlay, Point};
use crate::config::RuntimeConfig;
use crate::content::data::{CellKey, ItemMetadata, Manifest};
use crate::error::FetchError;

/// Input from the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Moved(Point),
    Clicked(Point),
    /// Pointer left the viewport
    Left,
    /// Page hidden or window lost focus
    Hidden,
}

type Completed = (Ticket<CellKey>, Result<ItemMetadata, FetchError>);

pub struct Session<S: GridSurface, M> {
    surface: S,
    handles: Vec<S::Handle>,
    sampler: PointerSampler,
    machine: HoverMachine,
    source: Arc<M>,
}

impl<S, M> Session<S, M>
where
    S: GridSurface + Overlay,
    M: MetadataSource,
{
    /// Render `manifest` on `surface` and get ready for pointer input
    pub fn start(manifest: &Manifest, mut surface: S, source: M, config: &RuntimeConfig) -> Self {
        let cells = CellMaps::from_manifest(manifest);
        let handles = render_grid(manifest, &cells, &config.logo, &mut surface);

        Self {
            surface,
            handles,
            sampler: PointerSampler::new(config.throttle),
            machine: HoverMachine::new(cells, config),
            source: Arc::new(source),
        }
    }

    pub fn state(&self) -> HoverState {
        self.machine.state()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Handles returned by the surface for the rendered cells
    pub fn handles(&self) -> &[S::Handle] {
        &self.handles
    }

    /// Process events until the sender side closes, then hand the surface
    /// back
    ///
    /// Fetch completions that have landed are settled before the next
    /// pointer event, so a busy pointer never holds a result back.
    pub async fn run(mut self, mut events: mpsc::Receiver<PointerEvent>) -> S {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completed>();

        loop {
            tokio::select! {
                biased;

                Some((ticket, result)) = done_rx.recv() => {
                    self.machine.on_fetched(ticket, result, &mut self.surface);
                }

                event = events.recv() => match event {
                    Some(event) => self.handle(event, &done_tx),
                    None => break,
                },
            }
        }

        debug!("pointer stream closed, ending session");
        self.surface
    }

    fn handle(&mut self, event: PointerEvent, done: &mpsc::UnboundedSender<Completed>) {
        match event {
            PointerEvent::Moved(point) => {
                let cell = match self.sampler.sample(Instant::now(), point, &self.surface) {
                    Sample::Throttled => return,
                    Sample::Resolved(cell) => cell,
                };
                if let Some(request) = self.machine.on_sample(cell.as_ref(), &mut self.surface) {
                    self.spawn_fetch(request, done.clone());
                }
            }
            PointerEvent::Clicked(point) => {
                if let Some(cell) = hit_test(&self.surface.cell_bounds(), point) {
                    self.machine.on_click(&cell);
                }
            }
            PointerEvent::Left | PointerEvent::Hidden => {
                self.machine.on_hidden(&mut self.surface);
            }
        }
    }

    fn spawn_fetch(&self, request: FetchRequest, done: mpsc::UnboundedSender<Completed>) {
        let source = Arc::clone(&self.source);
        tokio::spawn(async move {
            let result = source.fetch(&request.url).await;
            // The session may already be gone; the result is then moot.
            let _ = done.send((request.ticket, result));
        });
    }
}
