use crate::state::Command;

/// A command to run after `delay_ms`, on behalf of the state that scheduled it
#[derive(Debug, Clone, PartialEq)]
pub struct Deferred {
    pub delay_ms: f64,
    pub command: Command,
}

impl Deferred {
    pub fn after(delay_ms: f64, command: Command) -> Self {
        Deferred { delay_ms, command }
    }

    /// Runs on the next timer pass of the current tick
    pub fn now(command: Command) -> Self {
        Deferred::after(0.0, command)
    }
}

#[derive(Debug)]
struct Timer {
    due: f64,
    generation: u64,
    command: Command,
}

/// Pending deferred commands. Every state change advances the generation,
/// which silently drops whatever the previous state left behind.
#[derive(Debug, Default)]
pub struct Scheduler {
    generation: u64,
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn schedule(&mut self, now: f64, deferred: Deferred) {
        self.timers.push(Timer {
            due: now + deferred.delay_ms.max(0.0),
            generation: self.generation,
            command: deferred.command,
        });
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn advance_generation(&mut self) {
        self.generation += 1;
    }

    pub fn pending(&self) -> usize {
        self.timers
            .iter()
            .filter(|timer| timer.generation == self.generation)
            .count()
    }

    /// Earliest command due at `now`; ties go to the one scheduled first
    pub fn pop_due(&mut self, now: f64) -> Option<Command> {
        let generation = self.generation;
        self.timers.retain(|timer| timer.generation == generation);

        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= now)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due))
            .map(|(index, _)| index)?;
        Some(self.timers.remove(index).command)
    }
}
