//! Per-line routing state machine.

use mixer_gcode::GcodeDialect;
use tracing::trace;

use super::bands::Bands;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouteState {
    AwaitingLayer,
    ExpectingHeight,
}

/// Decides for every input line whether it goes to the output.
///
/// A single router is threaded through all inputs of a merge. The
/// selection flag survives file boundaries: a file's first marker line
/// is written according to where the previous file left off, and only
/// the height stamp after it re-evaluates the flag.
#[derive(Debug)]
pub struct Router<'a> {
    bands: &'a Bands,
    dialect: &'a GcodeDialect,
    selected: bool,
    state: RouteState,
    layers_taken: Vec<usize>,
}

impl<'a> Router<'a> {
    pub fn new(bands: &'a Bands, dialect: &'a GcodeDialect) -> Self {
        Self {
            bands,
            dialect,
            selected: true,
            state: RouteState::AwaitingLayer,
            layers_taken: vec![0; bands.len()],
        }
    }

    /// Reset the height expectation for a freshly opened file. The
    /// selection flag is left as it is.
    pub fn start_file(&mut self) {
        self.state = RouteState::AwaitingLayer;
    }

    /// Current selection flag.
    pub fn selected(&self) -> bool {
        self.selected
    }

    /// Layers whose height stamp selected each input.
    pub fn layers_taken(&self) -> &[usize] {
        &self.layers_taken
    }

    /// Route one line of input `index`; true means write it.
    pub fn route(&mut self, index: usize, line: &[u8]) -> bool {
        if self.dialect.is_layer_marker(line) {
            self.state = RouteState::ExpectingHeight;
            return self.selected;
        }

        if self.state == RouteState::ExpectingHeight {
            self.state = RouteState::AwaitingLayer;
            if let Some(height) = self.dialect.parse_height(line) {
                self.selected = self.bands.contains(index, height);
                trace!(index, height, selected = self.selected, "layer");
                if !self.selected {
                    return false;
                }
                if let Some(taken) = self.layers_taken.get_mut(index) {
                    *taken += 1;
                }
            }
        }

        self.selected
    }
}
