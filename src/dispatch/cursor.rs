//! Three nested indices with wraparound at the message level.

/// Indices of the next send
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub message: usize,
    pub credential: usize,
    pub destination: usize,
}

/// What the last [`Cursor::advance`] crossed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Step {
    /// The credential just used has been sent to every destination
    pub sweep_finished: bool,
    /// The whole triple space has been traversed
    pub cycle_finished: bool,
}

#[derive(Debug, Clone)]
pub struct Cursor {
    messages: usize,
    credentials: usize,
    destinations: usize,
    position: Position,
    cycles: u64,
}

impl Cursor {
    /// `None` when any dimension is empty
    pub fn new(messages: usize, credentials: usize, destinations: usize) -> Option<Self> {
        if messages == 0 || credentials == 0 || destinations == 0 {
            return None;
        }

        Some(Self {
            messages,
            credentials,
            destinations,
            position: Position::default(),
            cycles: 0,
        })
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Number of completed cycles
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn sends_per_cycle(&self) -> usize {
        self.messages * self.credentials * self.destinations
    }

    /// Move past the current position
    pub fn advance(&mut self) -> Step {
        let pos = &mut self.position;

        pos.destination = (pos.destination + 1) % self.destinations;
        if pos.destination != 0 {
            return Step::default();
        }

        pos.credential = (pos.credential + 1) % self.credentials;
        if pos.credential != 0 {
            return Step {
                sweep_finished: true,
                cycle_finished: false,
            };
        }

        pos.message = (pos.message + 1) % self.messages;
        let cycle_finished = pos.message == 0;
        if cycle_finished {
            self.cycles += 1;
        }

        Step {
            sweep_finished: true,
            cycle_finished,
        }
    }
}
