use embodied::{
    Action, AgentConfig, DemoAction, DemoObservation, EmbodiedTeacher, EmbodiedTeacherConfig,
    Env, EnvError, GoalTaskConfig, PlayGroundConfig, Sentence, SharedKeys, Space, TaskConfig,
};

const PIONEER: &str = "pioneer2dx_noplugin";

/// A fast pioneer setup: 10 sub-steps of 10 ms per environment step.
fn config() -> EmbodiedTeacherConfig {
    EmbodiedTeacherConfig {
        playground: PlayGroundConfig {
            agent_type: PIONEER.into(),
            world_time_precision: Some(0.01),
            seed: Some(7),
            ..PlayGroundConfig::default()
        },
        ..EmbodiedTeacherConfig::default()
    }
}

fn with_playground(f: impl FnOnce(&mut PlayGroundConfig)) -> EmbodiedTeacherConfig {
    let mut cfg = config();
    f(&mut cfg.playground);
    cfg
}

fn paired(learner: Vec<f32>, teacher: Vec<f32>) -> DemoAction {
    DemoAction::Paired {
        learner: Action::Control(learner),
        teacher,
    }
}

fn idle() -> DemoAction {
    paired(vec![0.0, 0.0], vec![0.0, 0.0])
}

#[test]
fn policy_reset_pairs_identical_observations() -> anyhow::Result<()> {
    let mut env = EmbodiedTeacher::new(config())?;
    match env.reset()? {
        DemoObservation::Paired { learner, teacher } => assert_eq!(learner, teacher),
        DemoObservation::Plain(_) => panic!("policy mode must pair observations"),
    }
    Ok(())
}

#[test]
fn policy_step_observes_the_teacher_robot() -> anyhow::Result<()> {
    let mut env = EmbodiedTeacher::new(config())?;
    env.reset()?;
    let (obs, _, _, _) = env.step(idle())?;
    let learner = obs.learner().states().unwrap().to_vec();
    let teacher = obs.teacher().unwrap().states().unwrap().to_vec();
    assert_ne!(learner, teacher);
    // goal position is shared, the pose is the robot's own
    assert_eq!(&learner[..3], &teacher[..3]);
    assert!((teacher[4] + 2.0).abs() < 1e-4);
    assert!(learner[4].abs() < 1e-4);
    Ok(())
}

#[test]
fn spaces_are_keyed_by_role_in_policy_mode() -> anyhow::Result<()> {
    let env = EmbodiedTeacher::new(config())?;
    let action_space = env.action_space();
    assert_eq!(action_space.get("learner"), Some(env.control_space()));
    assert_eq!(action_space.get("teacher"), env.teacher_action_space());
    assert_eq!(env.teacher_control_space().unwrap().shape(), vec![2]);

    let obs_space = env.observation_space();
    assert_eq!(obs_space.get("learner").unwrap().shape(), vec![12 + 4]);
    assert_eq!(obs_space.get("teacher"), env.teacher_observation_space());
    Ok(())
}

#[test]
fn info_is_always_empty() -> anyhow::Result<()> {
    let mut env = EmbodiedTeacher::new(config())?;
    env.reset()?;
    for _ in 0..3 {
        let (_, _, _, info) = env.step(paired(vec![3.0, 1.0], vec![-2.0, 2.0]))?;
        assert!(info.is_empty());
    }
    Ok(())
}

#[test]
fn reward_is_teacher_feedback_without_action_cost() -> anyhow::Result<()> {
    let mut env = EmbodiedTeacher::new(config())?;
    env.reset()?;
    for _ in 0..3 {
        let (_, reward, done, _) = env.step(paired(vec![5.0, 5.0], vec![1.0, 1.0]))?;
        assert_eq!(reward, env.last_feedback().reward);
        assert_eq!(done, env.last_feedback().done);
    }
    Ok(())
}

#[test]
fn action_cost_penalises_learner_controls_only() -> anyhow::Result<()> {
    let mut env = EmbodiedTeacher::new(with_playground(|p| p.action_cost = 0.1))?;
    env.reset()?;
    let (_, reward, _, _) = env.step(paired(vec![2.0, 4.0], vec![20.0, 20.0]))?;
    let expected = env.last_feedback().reward - 0.1 * 10.0;
    assert!((reward - expected).abs() < 1e-5);
    Ok(())
}

#[test]
fn both_robots_move_in_the_same_tick() -> anyhow::Result<()> {
    let mut env = EmbodiedTeacher::new(config())?;
    env.reset()?;
    env.step(paired(vec![0.0, 0.0], vec![8.0, 8.0]))?;
    let world = env.world();
    let learner = world.model(env.learner().id());
    let teacher = world.model(env.teacher_agent().id());
    assert_eq!(learner.pose.position.x, 0.0);
    assert!(teacher.pose.position.x > 0.0);
    Ok(())
}

#[test]
fn teacher_is_placed_at_its_initial_pose() -> anyhow::Result<()> {
    let mut cfg = config();
    cfg.initial_teacher_pose = "1 3 0 0 0 1.5".into();
    let mut env = EmbodiedTeacher::new(cfg)?;
    env.step(paired(vec![0.0, 0.0], vec![6.0, 6.0]))?;
    env.reset()?;
    let pose = env.world().model(env.teacher_agent().id()).pose;
    assert_eq!(pose.position.x, 1.0);
    assert_eq!(pose.position.y, 3.0);
    assert!((pose.yaw() - 1.5).abs() < 1e-6);
    Ok(())
}

#[test]
fn bad_teacher_pose_is_rejected() {
    let mut cfg = config();
    cfg.initial_teacher_pose = "0 -2".into();
    assert!(matches!(EmbodiedTeacher::new(cfg), Err(EnvError::World(_))));
}

#[test]
fn teacher_config_overrides_control_limit() -> anyhow::Result<()> {
    let mut cfg = config();
    let mut teacher = AgentConfig::for_agent_type(PIONEER)?;
    teacher.control_limit = 1.0;
    cfg.teacher_config = Some(teacher);
    let mut env = EmbodiedTeacher::new(cfg)?;

    let space = env.teacher_control_space().unwrap().as_box().unwrap().clone();
    assert!(space.contains(&[1.0, -1.0]));
    assert!(!space.contains(&[2.0, 0.0]));

    env.reset()?;
    env.step(paired(vec![0.0, 0.0], vec![10.0, 10.0]))?;
    assert_eq!(env.world().model(env.teacher_agent().id()).commands()[0], 1.0);
    Ok(())
}

#[test]
fn step_counter_counts_and_resets() -> anyhow::Result<()> {
    let mut env = EmbodiedTeacher::new(config())?;
    env.reset()?;
    assert_eq!(env.steps_in_this_episode(), 0);
    for n in 1..=4 {
        env.step(idle())?;
        assert_eq!(env.steps_in_this_episode(), n);
    }
    env.reset()?;
    assert_eq!(env.steps_in_this_episode(), 0);
    assert_eq!(env.cum_reward(), 0.0);
    Ok(())
}

#[test]
fn short_episodes_end_in_failure() -> anyhow::Result<()> {
    let mut env = EmbodiedTeacher::new(with_playground(|p| {
        p.tasks = vec![TaskConfig::Goal(GoalTaskConfig {
            max_steps: 3,
            ..GoalTaskConfig::default()
        })];
    }))?;
    env.reset()?;
    let mut done = false;
    let mut reward = 0.0;
    while !done {
        assert!(env.steps_in_this_episode() < 3);
        (_, reward, done, _) = env.step(idle())?;
    }
    assert_eq!(reward, -1.0);
    assert!(!env.last_feedback().success);
    assert_eq!(env.cum_reward(), -1.0);
    Ok(())
}

#[test]
fn mismatched_actions_are_rejected() -> anyhow::Result<()> {
    let mut env = EmbodiedTeacher::new(config())?;
    env.reset()?;
    let err = env
        .step(DemoAction::Plain(Action::Control(vec![0.0, 0.0])))
        .unwrap_err();
    assert!(matches!(err, EnvError::ActionMismatch(_)));

    let err = env.step(paired(vec![0.0, 0.0], vec![0.0])).unwrap_err();
    assert!(matches!(err, EnvError::ControlLength { expected: 2, actual: 1, .. }));
    Ok(())
}

#[test]
fn language_accepts_raw_and_encoded_sentences() -> anyhow::Result<()> {
    let mut env = EmbodiedTeacher::new(with_playground(|p| {
        p.with_language = true;
        p.vocab_sequence_length = 5;
    }))?;
    let obs = env.reset()?;
    let seq = obs.learner().sentence.clone().unwrap();
    assert_eq!(seq.len(), 5);
    assert_eq!(env.playground().teacher().sequence_to_sentence(&seq)?, "go to goal");
    assert!(obs.teacher().unwrap().sentence.is_some());

    let raw = DemoAction::Paired {
        learner: Action::Language {
            control: vec![0.0, 0.0],
            sentence: Sentence::from("go to goal"),
        },
        teacher: vec![0.0, 0.0],
    };
    let (obs, _, _, _) = env.step(raw)?;
    // the teacher robot never hears language
    assert!(obs.teacher().unwrap().sentence.is_none());

    let encoded = DemoAction::Paired {
        learner: Action::Language {
            control: vec![0.0, 0.0],
            sentence: Sentence::Encoded(seq),
        },
        teacher: vec![0.0, 0.0],
    };
    env.step(encoded)?;

    let unknown = DemoAction::Paired {
        learner: Action::Language {
            control: vec![0.0, 0.0],
            sentence: Sentence::Encoded(vec![999]),
        },
        teacher: vec![0.0, 0.0],
    };
    assert!(matches!(
        env.step(unknown),
        Err(EnvError::UnknownToken { token: 999, .. })
    ));

    let learner_space = env.action_space().get("learner").unwrap();
    assert!(matches!(learner_space.get("sentence"), Some(Space::MultiDiscrete(n)) if n.len() == 5));
    Ok(())
}

#[test]
fn human_mode_looks_like_the_playground() -> anyhow::Result<()> {
    let keys = SharedKeys::new();
    let mut cfg = config();
    cfg.demo_by_human = true;
    let mut env = EmbodiedTeacher::with_key_source(cfg, keys.clone())?;

    assert!(env.is_human_demo());
    assert_eq!(env.world().real_time_update_rate(), 500);
    assert_eq!(env.config().playground.real_time_update_rate, 500);
    assert!(env.teacher_control_space().is_none());
    assert_eq!(env.action_space(), env.control_space());

    assert!(matches!(env.reset()?, DemoObservation::Plain(_)));

    keys.press('w');
    let (obs, _, _, info) = env.step(DemoAction::Plain(Action::Control(vec![0.0, 0.0])))?;
    assert!(matches!(obs, DemoObservation::Plain(_)));
    assert!(info.is_empty());
    assert!(env.world().model(env.teacher_agent().id()).pose.position.x > 0.0);

    assert!(matches!(
        env.step(idle()),
        Err(EnvError::ActionMismatch(_))
    ));
    Ok(())
}

#[test]
fn rejected_teacher_action_leaves_the_learner_idle() -> anyhow::Result<()> {
    let mut env = EmbodiedTeacher::new(config())?;
    env.reset()?;
    let err = env.step(paired(vec![5.0, 5.0], vec![0.0])).unwrap_err();
    assert!(matches!(err, EnvError::ControlLength { .. }));
    assert!(env.world().model(env.learner().id()).commands().iter().all(|c| *c == 0.0));
    assert_eq!(env.steps_in_this_episode(), 0);
    assert_eq!(env.world().iterations(), 0);
    Ok(())
}

#[test]
fn human_mode_needs_a_keyboard_layout_of_the_teacher_size() -> anyhow::Result<()> {
    let mut cfg = config();
    cfg.demo_by_human = true;
    let mut teacher = AgentConfig::for_agent_type(PIONEER)?;
    teacher.control_joints.truncate(1);
    cfg.teacher_config = Some(teacher);
    assert!(matches!(
        EmbodiedTeacher::new(cfg),
        Err(EnvError::ControlLength { expected: 1, actual: 2, .. })
    ));
    Ok(())
}

fn youbot_by_hand(keys: &SharedKeys) -> anyhow::Result<EmbodiedTeacher> {
    let cfg = EmbodiedTeacherConfig {
        demo_by_human: true,
        ..with_playground(|p| p.agent_type = "youbot_noplugin".into())
    };
    Ok(EmbodiedTeacher::with_key_source(cfg, keys.clone())?)
}

fn teacher_gripper(env: &EmbodiedTeacher) -> f32 {
    let model = env.world().model(env.teacher_agent().id());
    let joint = model.spec.joint_index("gripper_finger_joint_l").unwrap();
    model.commands()[joint]
}

#[test]
fn reset_closes_the_gripper_again() -> anyhow::Result<()> {
    let keys = SharedKeys::new();
    let mut env = youbot_by_hand(&keys)?;
    env.reset()?;
    let still = || DemoAction::Plain(Action::Control(vec![0.0; 11]));

    keys.press('e');
    env.step(still())?;
    assert!(teacher_gripper(&env) > 0.0);

    env.reset()?;
    keys.release('e');
    env.step(still())?;
    assert!(teacher_gripper(&env) < 0.0);
    Ok(())
}

#[test]
fn rejected_step_does_not_read_the_keyboard() -> anyhow::Result<()> {
    let keys = SharedKeys::new();
    let mut env = youbot_by_hand(&keys)?;
    env.reset()?;

    keys.press('e');
    let err = env
        .step(DemoAction::Plain(Action::Control(vec![0.0; 2])))
        .unwrap_err();
    assert!(matches!(err, EnvError::ControlLength { .. }));
    keys.release('e');

    // the press was never seen, so the gripper is still closing
    env.step(DemoAction::Plain(Action::Control(vec![0.0; 11])))?;
    assert!(teacher_gripper(&env) < 0.0);
    Ok(())
}
