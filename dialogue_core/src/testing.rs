//! Testing utilities for sessions.
//!
//! Deterministic stand-ins for the generator, the operator and the clock,
//! so whole sessions can run without network access or wall-clock time.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use crate::events::SessionEvent;
use crate::generator::{GeneratorError, TextGenerator};
use crate::session::{Clock, NarratorCommand, Operator};

/// A generator that returns scripted responses in order and records every
/// prompt it was given.
///
/// Once the script runs out it returns empty responses.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queue another response.
    pub fn push_response(&self, response: impl Into<String>) {
        lock(&self.responses).push_back(response.into());
    }

    /// Every prompt received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
        lock(&self.prompts).push(prompt.to_string());
        Ok(lock(&self.responses).pop_front().unwrap_or_default())
    }
}

/// A generator that always fails with the same error.
#[derive(Debug, Clone)]
pub struct FailingGenerator {
    error: GeneratorError,
}

impl FailingGenerator {
    pub fn new(error: GeneratorError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GeneratorError> {
        Err(self.error.clone())
    }
}

/// An operator that replays scripted commands and records notifications.
///
/// Ends the scene once the script is exhausted.
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    commands: VecDeque<NarratorCommand>,
    events: Vec<SessionEvent>,
}

impl ScriptedOperator {
    pub fn new(commands: impl IntoIterator<Item = NarratorCommand>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
            events: Vec::new(),
        }
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }
}

impl Operator for ScriptedOperator {
    fn next_command(&mut self) -> io::Result<NarratorCommand> {
        Ok(self.commands.pop_front().unwrap_or(NarratorCommand::End))
    }

    fn notify(&mut self, event: &SessionEvent) -> io::Result<()> {
        self.events.push(event.clone());
        Ok(())
    }
}

/// A clock that starts at a fixed instant and advances by `step` per read.
#[derive(Debug)]
pub struct FixedClock {
    next: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl FixedClock {
    /// A clock advancing one minute per read.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            next: Mutex::new(start),
            step: Duration::minutes(1),
        }
    }

    pub fn with_step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = lock(&self.next);
        let now = *next;
        *next = now + self.step;
        now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_scripted_generator() {
        let generator = ScriptedGenerator::new(["one"]);
        generator.push_response("two");

        assert_eq!(generator.generate("p1").await.unwrap(), "one");
        assert_eq!(generator.generate("p2").await.unwrap(), "two");
        assert_eq!(generator.generate("p3").await.unwrap(), "");
        assert_eq!(generator.prompts(), vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn test_fixed_clock_steps() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap();
        let clock = FixedClock::new(start).with_step(Duration::seconds(30));

        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start + Duration::seconds(30));
    }

    #[test]
    fn test_scripted_operator_ends_when_exhausted() {
        let mut operator = ScriptedOperator::new([NarratorCommand::Continue]);

        assert_eq!(operator.next_command().unwrap(), NarratorCommand::Continue);
        assert_eq!(operator.next_command().unwrap(), NarratorCommand::End);
    }
}
