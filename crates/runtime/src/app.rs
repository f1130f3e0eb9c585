//! Demo loop: a random learner next to a random or human teacher.

use std::time::Instant;

use embodied::{sample_multi_discrete, Action, DemoAction, EmbodiedTeacher, EnvError, Env, Sentence, Space};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DemoStats {
    pub steps: usize,
    pub episodes: usize,
}

fn sample(space: Option<&Space>, rng: &mut fastrand::Rng) -> Vec<f32> {
    space
        .and_then(Space::as_box)
        .map(|b| b.sample(rng))
        .unwrap_or_default()
}

/// Random token sequence shaped like the learner's sentence action.
fn babble(env: &EmbodiedTeacher, rng: &mut fastrand::Rng) -> Vec<u32> {
    let learner = if env.is_human_demo() {
        Some(env.action_space())
    } else {
        env.action_space().get("learner")
    };
    match learner.and_then(|space| space.get("sentence")) {
        Some(Space::MultiDiscrete(nvec)) => sample_multi_discrete(nvec, rng),
        _ => Vec::new(),
    }
}

fn next_action(env: &EmbodiedTeacher, rng: &mut fastrand::Rng) -> DemoAction {
    let control = sample(Some(env.control_space()), rng);
    let learner = if env.config().playground.with_language {
        Action::Language {
            control,
            sentence: Sentence::Encoded(babble(env, rng)),
        }
    } else {
        Action::Control(control)
    };
    if env.is_human_demo() {
        DemoAction::Plain(learner)
    } else {
        DemoAction::Paired {
            learner,
            teacher: sample(env.teacher_control_space(), rng),
        }
    }
}

/// Step `env` for `steps` steps, resetting at episode ends.
pub fn run(
    env: &mut EmbodiedTeacher,
    steps: usize,
    rng: &mut fastrand::Rng,
) -> Result<DemoStats, EnvError> {
    let mut stats = DemoStats::default();
    env.reset()?;
    let mut episode_start = Instant::now();

    for step in 0..steps {
        let action = next_action(env, rng);
        let (_, reward, done, _) = env.step(action)?;
        stats.steps += 1;

        if step == 0 || done {
            tracing::info!(sentence = %env.last_feedback().sentence, reward, "teacher says");
        }
        if done {
            let episode_steps = env.steps_in_this_episode();
            let secs = episode_start.elapsed().as_secs_f32();
            tracing::info!(
                episode = stats.episodes,
                steps = episode_steps,
                cum_reward = env.cum_reward(),
                steps_per_sec = episode_steps as f32 / secs.max(f32::EPSILON),
                "episode finished"
            );
            stats.episodes += 1;
            env.reset()?;
            episode_start = Instant::now();
        }
    }
    Ok(stats)
}
