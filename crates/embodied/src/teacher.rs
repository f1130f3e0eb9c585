//! # Teacher

use physics::{ModelId, World};

use crate::config::TaskConfig;
use crate::error::EnvError;
use crate::task::{GoalTask, Task, TeacherFeedback};
use crate::vocab::Vocabulary;

/// Runs the configured tasks and speaks for them.
pub struct Teacher {
    tasks: Vec<Box<dyn Task>>,
    vocab: Vocabulary,
    rng: fastrand::Rng,
}

impl Teacher {
    pub fn new(tasks: Vec<Box<dyn Task>>, seed: Option<u64>) -> Self {
        let sentences: Vec<String> = tasks.iter().flat_map(|t| t.vocab()).collect();
        let vocab = Vocabulary::new(sentences.iter().map(String::as_str));
        let rng = seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
        Self { tasks, vocab, rng }
    }

    /// Build the tasks described by `configs` inside `world`.
    ///
    /// # Errors
    ///
    /// Propagates task construction failures.
    pub fn from_configs(
        configs: &[TaskConfig],
        world: &mut World,
        seed: Option<u64>,
    ) -> Result<Self, EnvError> {
        let tasks = configs
            .iter()
            .map(|cfg| match cfg {
                TaskConfig::Goal(goal) => {
                    GoalTask::new(goal.clone(), world).map(|t| Box::new(t) as Box<dyn Task>)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(tasks, seed))
    }

    pub fn seed(&mut self, seed: u64) {
        self.rng.seed(seed);
    }

    pub fn reset(&mut self, world: &mut World, agent: ModelId) {
        for task in &mut self.tasks {
            task.reset(world, agent, &mut self.rng);
        }
    }

    /// One round of feedback: rewards add up, any finished task ends the
    /// episode, and the first task with something to say gets the sentence.
    pub fn teach(&mut self, world: &World, agent: ModelId, sentence: &str) -> TeacherFeedback {
        let mut feedback = TeacherFeedback::default();
        for task in &mut self.tasks {
            let fb = task.run(world, agent, sentence);
            if fb.done {
                tracing::debug!(task = task.name(), success = fb.success, reward = fb.reward, "task finished");
            }
            feedback.reward += fb.reward;
            feedback.done |= fb.done;
            feedback.success |= fb.success;
            if feedback.sentence.is_empty() {
                feedback.sentence = fb.sentence;
            }
        }
        feedback
    }

    #[must_use]
    pub fn task_specific_observation(&self, world: &World, agent: ModelId) -> Vec<f32> {
        self.tasks
            .iter()
            .flat_map(|t| t.task_specific_observation(world, agent))
            .collect()
    }

    #[must_use]
    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    #[must_use]
    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    /// # Errors
    ///
    /// See [`Vocabulary::sentence_to_sequence`].
    pub fn sentence_to_sequence(&self, sentence: &str, max_len: usize) -> Result<Vec<u32>, EnvError> {
        self.vocab.sentence_to_sequence(sentence, max_len)
    }

    /// # Errors
    ///
    /// See [`Vocabulary::sequence_to_sentence`].
    pub fn sequence_to_sentence(&self, seq: &[u32]) -> Result<String, EnvError> {
        self.vocab.sequence_to_sentence(seq)
    }
}
