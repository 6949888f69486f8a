//! Game state and session rules
//!
//! `GameState` is the only writer of score, lives, combo and progression. Entities
//! and effects are owned here and mutated during the fixed step; the presentation
//! layer reads a [`Snapshot`] and drains [`GameEvent`]s.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::{Effects, Notification, Starfield};
use super::entities::{ExpressionBlock, FloatingText, Player, Projectile, TextTone};
use super::scheduler::{Scheduler, Task, TaskHandle};
use super::scoring::answer_points;
use super::snapshot::Snapshot;
use crate::consts::*;
use crate::quiz::{
    AnswerSet, Category, Question, current_category, has_won_game, prepare_answers,
    random_question,
};
use crate::settings::Settings;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen; no session running
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Out of lives
    GameOver,
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    QuestionSpawned { category: Category },
    /// A projectile left the ship
    Shot { answer_index: usize, correct: bool },
    AnswerCorrect { points: u64, combo: u32 },
    AnswerWrong { lives: u32 },
    /// A new category was reached
    LevelUp { category: Category },
    /// All six categories cleared
    Victory,
    LearnPrompt { correct: bool },
    GameOver { score: u64, max_combo: u32 },
}

/// Explanation shown after an answer in learn mode
#[derive(Debug, Clone, Serialize)]
pub struct LearnPrompt {
    pub expression: String,
    pub correct_answer: String,
    pub explanation: String,
    pub was_correct: bool,
    /// Wrong answers wait for the player
    pub requires_dismiss: bool,
    #[serde(skip)]
    pub auto_dismiss: Option<TaskHandle>,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    pub combo: u32,
    pub max_combo: u32,
    /// Monotonic within a session; drives level unlocking
    pub questions_answered: u32,
    pub settings: Settings,
    pub canvas: Vec2,
    pub player: Player,
    pub expression: Option<ExpressionBlock>,
    pub question: Option<Question>,
    pub answers: Option<AnswerSet>,
    /// Set on shoot; cleared when the next question spawns
    pub answers_locked: bool,
    /// The current question already produced an outcome
    question_resolved: bool,
    pub projectiles: Vec<Projectile>,
    pub floating_texts: Vec<FloatingText>,
    pub learn: Option<LearnPrompt>,
    pub effects: Effects,
    /// Simulation step counter
    pub time_ticks: u64,
    /// Unsimulated wall time (seconds)
    pub(crate) accumulator: f32,
    pub(crate) scheduler: Scheduler,
    events: Vec<GameEvent>,
    victory_celebrated: bool,
    /// Deferred unlimited-mode spawn while the victory banner plays
    victory_spawn: Option<TaskHandle>,
}

impl GameState {
    /// Create a session sitting at the menu
    pub fn new(seed: u64, canvas: Vec2, settings: Settings) -> Self {
        let canvas = canvas.max(Vec2::ONE);
        let mut rng = Pcg32::seed_from_u64(seed);
        let starfield = Starfield::new(canvas, &mut rng);
        let effects = Effects::new(starfield, settings.max_particles());

        Self {
            seed,
            rng,
            phase: GamePhase::Menu,
            score: 0,
            lives: STARTING_LIVES,
            combo: 0,
            max_combo: 0,
            questions_answered: 0,
            settings,
            canvas,
            player: Player::new(canvas),
            expression: None,
            question: None,
            answers: None,
            answers_locked: true,
            question_resolved: false,
            projectiles: Vec::new(),
            floating_texts: Vec::new(),
            learn: None,
            effects,
            time_ticks: 0,
            accumulator: 0.0,
            scheduler: Scheduler::new(),
            events: Vec::new(),
            victory_celebrated: false,
            victory_spawn: None,
        }
    }

    /// Begin a fresh run (also used for restart)
    pub fn start_game(&mut self) {
        self.scheduler.cancel_all();
        self.clear_session();
        self.phase = GamePhase::Playing;
        log::info!("Starting game (seed {})", self.seed);
        self.next_question();
    }

    /// Tear the session down and show the menu
    pub fn return_to_menu(&mut self) {
        self.scheduler.cancel_all();
        self.clear_session();
        self.phase = GamePhase::Menu;
    }

    fn clear_session(&mut self) {
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.combo = 0;
        self.max_combo = 0;
        self.questions_answered = 0;
        self.player = Player::new(self.canvas);
        self.expression = None;
        self.question = None;
        self.answers = None;
        self.answers_locked = true;
        self.question_resolved = false;
        self.projectiles.clear();
        self.floating_texts.clear();
        self.learn = None;
        self.effects.reset();
        self.accumulator = 0.0;
        self.victory_celebrated = false;
        self.victory_spawn = None;
    }

    /// Update canvas bounds
    pub fn resize(&mut self, width: f32, height: f32) {
        if !width.is_finite() || !height.is_finite() {
            return;
        }
        self.canvas = Vec2::new(width, height).max(Vec2::ONE);
        self.player.resize(self.canvas);
        if let Some(block) = &mut self.expression {
            block.resize(self.canvas);
        }
        self.effects.starfield.resize(self.canvas);
    }

    /// Pointer moved; only steers the ship while playing
    pub fn move_player(&mut self, x: f32) {
        if self.phase == GamePhase::Playing {
            self.player.move_to(x);
        }
    }

    /// Replace settings (particle cap follows immediately)
    pub fn set_settings(&mut self, settings: Settings) {
        self.effects.set_max_particles(settings.max_particles());
        self.settings = settings;
    }

    pub fn set_learn_mode(&mut self, enabled: bool) {
        self.settings.learn_mode = enabled;
    }

    /// Whether `shoot` would currently be accepted
    pub fn answers_enabled(&self) -> bool {
        self.phase == GamePhase::Playing
            && !self.answers_locked
            && self.expression.is_some()
            && self.answers.is_some()
    }

    /// Fire the answer at `answer_index`. Returns false (and does nothing) when
    /// answering is not possible right now.
    pub fn shoot(&mut self, answer_index: usize) -> bool {
        if !self.answers_enabled() || answer_index >= ANSWER_COUNT {
            return false;
        }
        let (Some(block), Some(answers)) = (&self.expression, &self.answers) else {
            return false;
        };
        let target = block.pos;
        let correct = answers.is_correct(answer_index);

        self.projectiles
            .push(Projectile::new(self.player.muzzle(), target, answer_index));
        self.answers_locked = true;
        self.events.push(GameEvent::Shot {
            answer_index,
            correct,
        });
        true
    }

    /// Resolve the current question with the answer a projectile carried
    pub fn handle_answer(&mut self, answer_index: usize) {
        if self.phase != GamePhase::Playing || self.question_resolved {
            return;
        }
        let Some(answers) = &self.answers else {
            return;
        };
        let correct = answers.is_correct(answer_index);
        self.resolve(correct);
    }

    /// The block fell off screen without an answer: counts as wrong
    pub(crate) fn expire_question(&mut self) {
        let expired = self.expression.as_ref().is_some_and(|b| b.is_expired());
        if self.phase == GamePhase::Playing
            && expired
            && !self.answers_locked
            && !self.question_resolved
            && self.projectiles.is_empty()
        {
            log::info!("Question expired unanswered");
            self.resolve(false);
        }
    }

    fn resolve(&mut self, correct: bool) {
        self.question_resolved = true;
        self.answers_locked = true;

        let at = self
            .expression
            .as_ref()
            .map(|b| b.pos)
            .unwrap_or(self.canvas / 2.0);
        if correct {
            self.reward(at);
        } else {
            self.penalize(at);
        }

        self.questions_answered += 1;

        if self.settings.learn_mode {
            self.show_learn(correct);
        } else if self.lives > 0 {
            self.scheduler.schedule(NEXT_QUESTION_DELAY, Task::NextQuestion);
        }
    }

    fn reward(&mut self, at: Vec2) {
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);

        let difficulty = self.question.as_ref().map(|q| q.difficulty).unwrap_or(1);
        let points = answer_points(self.combo, difficulty);
        self.score += points;

        self.effects.explode(at, &mut self.rng);
        if self.combo >= 5 {
            self.effects.combo_sparkle(at, &mut self.rng);
        }
        self.floating_texts.push(FloatingText::new(
            at - Vec2::new(0.0, FLOATING_TEXT_OFFSET),
            format!("+{}", points),
            TextTone::Positive,
        ));

        self.events.push(GameEvent::AnswerCorrect {
            points,
            combo: self.combo,
        });
    }

    fn penalize(&mut self, at: Vec2) {
        self.combo = 0;
        self.lives = self.lives.saturating_sub(1);

        self.effects.error_burst(at, &mut self.rng);
        self.floating_texts.push(FloatingText::new(
            at - Vec2::new(0.0, FLOATING_TEXT_OFFSET),
            "-1 LIFE",
            TextTone::Negative,
        ));
        self.effects.wrong_feedback(
            self.settings.effective_screen_shake(),
            self.settings.effective_flash(),
        );

        self.events.push(GameEvent::AnswerWrong { lives: self.lives });

        if self.lives == 0 {
            self.scheduler.schedule(GAME_OVER_DELAY, Task::GameOver);
        }
    }

    fn show_learn(&mut self, correct: bool) {
        let Some(question) = &self.question else {
            return;
        };
        let auto_dismiss = correct.then(|| {
            self.scheduler
                .schedule(LEARN_AUTO_DISMISS_DELAY, Task::DismissLearn)
        });
        self.learn = Some(LearnPrompt {
            expression: question.expression.clone(),
            correct_answer: question.correct.clone(),
            explanation: question.explanation.clone(),
            was_correct: correct,
            requires_dismiss: !correct,
            auto_dismiss,
        });
        self.events.push(GameEvent::LearnPrompt { correct });
    }

    /// Close the learn prompt and advance (while lives remain). Returns whether a
    /// prompt was open.
    pub fn dismiss_learn(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::Playing | GamePhase::GameOver) {
            return false;
        }
        let Some(prompt) = self.learn.take() else {
            return false;
        };
        if let Some(handle) = prompt.auto_dismiss {
            self.scheduler.cancel(handle);
        }
        if self.phase == GamePhase::Playing && self.lives > 0 {
            self.next_question();
        }
        true
    }

    /// Advance progression and spawn the next question
    pub fn next_question(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let answered = self.questions_answered;
        let category = current_category(answered);

        if self
            .victory_spawn
            .is_some_and(|handle| self.scheduler.is_pending(handle))
        {
            // The unlimited question is already on its way
            return;
        }

        if has_won_game(answered) && !self.victory_celebrated {
            self.victory_celebrated = true;
            self.effects.victory = Some(Notification::new(category, VICTORY_STEPS));
            for burst in 0..CELEBRATION_BURSTS {
                self.scheduler.schedule(
                    burst as f32 * CELEBRATION_INTERVAL,
                    Task::Celebrate { burst },
                );
            }
            self.victory_spawn = Some(
                self.scheduler
                    .schedule(VICTORY_SPAWN_DELAY, Task::SpawnQuestion(category)),
            );
            self.events.push(GameEvent::Victory);
            log::info!("All categories cleared, unlimited mode unlocked (score {})", self.score);
            return;
        }

        if answered > 0
            && !has_won_game(answered)
            && current_category(answered - 1) != category
        {
            self.effects.level_up = Some(Notification::new(category, LEVEL_UP_STEPS));
            self.events.push(GameEvent::LevelUp { category });
            log::info!("Level up: {}", category.display_name());
        }

        self.spawn_question(category);
    }

    fn spawn_question(&mut self, category: Category) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let question = random_question(category, &mut self.rng);
        let answers = prepare_answers(&question, &mut self.rng);

        self.expression = Some(ExpressionBlock::new(self.canvas, &question.expression));
        self.question = Some(question);
        self.answers = Some(answers);
        self.answers_locked = false;
        self.question_resolved = false;
        self.projectiles.clear();

        self.events.push(GameEvent::QuestionSpawned { category });
    }

    fn game_over(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.scheduler.cancel_all();
        self.projectiles.clear();
        self.answers_locked = true;

        log::info!(
            "Game over: score {}, max combo {}, {} answered",
            self.score,
            self.max_combo,
            self.questions_answered
        );
        self.events.push(GameEvent::GameOver {
            score: self.score,
            max_combo: self.max_combo,
        });
    }

    /// Execute a scheduled task that came due
    pub(crate) fn run_task(&mut self, task: Task) {
        match task {
            Task::NextQuestion => self.next_question(),
            Task::SpawnQuestion(category) => self.spawn_question(category),
            Task::GameOver => self.game_over(),
            Task::DismissLearn => {
                self.dismiss_learn();
            }
            Task::Celebrate { burst } => {
                self.effects.celebrate(self.canvas, burst, &mut self.rng);
            }
        }
    }

    /// Tasks waiting to run, soonest first
    pub fn pending_tasks(&self) -> Vec<Task> {
        self.scheduler.pending_tasks()
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::capture(self)
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::WIN_THRESHOLD;

    fn state(learn_mode: bool) -> GameState {
        let settings = Settings {
            learn_mode,
            ..Default::default()
        };
        GameState::new(
            42,
            Vec2::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT),
            settings,
        )
    }

    fn correct_index(state: &GameState) -> usize {
        state.answers.as_ref().map(|a| a.correct_index).unwrap_or(0)
    }

    fn wrong_index(state: &GameState) -> usize {
        (correct_index(state) + 1) % ANSWER_COUNT
    }

    #[test]
    fn test_new_session_is_in_menu() {
        let state = state(false);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.lives, STARTING_LIVES);
        assert!(state.question.is_none());
    }

    #[test]
    fn test_start_spawns_question() {
        let mut state = state(false);
        state.start_game();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.expression.is_some());
        let question = state.question.as_ref().map(|q| q.category);
        assert_eq!(question, Some(Category::TypeCoercion));
        assert!(state.answers_enabled());
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::QuestionSpawned {
                category: Category::TypeCoercion
            }]
        );
    }

    #[test]
    fn test_shoot_locks_answers() {
        let mut state = state(false);
        assert!(!state.shoot(0));
        state.start_game();
        assert!(!state.shoot(3));
        assert!(state.shoot(1));
        assert!(!state.shoot(0));
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].answer_index, 1);
    }

    #[test]
    fn test_correct_answer_scores() {
        let mut state = state(false);
        state.start_game();
        state.handle_answer(correct_index(&state));
        assert_eq!(state.score, 100);
        assert_eq!(state.combo, 1);
        assert_eq!(state.max_combo, 1);
        assert_eq!(state.questions_answered, 1);
        assert_eq!(state.floating_texts.len(), 1);
        assert_eq!(state.floating_texts[0].text, "+100");
        assert_eq!(state.pending_tasks(), vec![Task::NextQuestion]);
    }

    #[test]
    fn test_wrong_answer_costs_life() {
        let mut state = state(false);
        state.start_game();
        state.handle_answer(correct_index(&state));
        state.next_question();
        state.handle_answer(wrong_index(&state));
        assert_eq!(state.lives, STARTING_LIVES - 1);
        assert_eq!(state.combo, 0);
        assert_eq!(state.max_combo, 1);
        assert_eq!(state.questions_answered, 2);
        assert!(state.effects.screen_shake > 0.0);
        assert_eq!(state.effects.flash_steps, FLASH_STEPS);
        let last = state.floating_texts.last().map(|t| (t.text.as_str(), t.tone));
        assert_eq!(last, Some(("-1 LIFE", TextTone::Negative)));
    }

    #[test]
    fn test_answer_resolves_once() {
        let mut state = state(false);
        state.start_game();
        let idx = correct_index(&state);
        state.handle_answer(idx);
        state.handle_answer(idx);
        assert_eq!(state.questions_answered, 1);
        assert_eq!(state.score, 100);
    }

    #[test]
    fn test_reduced_motion_skips_shake() {
        let mut state = state(false);
        state.set_settings(Settings {
            learn_mode: false,
            reduced_motion: true,
            ..Default::default()
        });
        state.start_game();
        state.handle_answer(wrong_index(&state));
        assert_eq!(state.effects.screen_shake, 0.0);
        assert_eq!(state.effects.flash_steps, 0);
    }

    #[test]
    fn test_last_life_schedules_game_over() {
        let mut state = state(false);
        state.start_game();
        state.lives = 1;
        state.handle_answer(wrong_index(&state));
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.pending_tasks(), vec![Task::GameOver]);
    }

    #[test]
    fn test_learn_mode_wrong_waits_for_dismiss() {
        let mut state = state(true);
        state.start_game();
        state.handle_answer(wrong_index(&state));
        let prompt = state.learn.as_ref().map(|p| (p.was_correct, p.requires_dismiss));
        assert_eq!(prompt, Some((false, true)));
        assert!(state.pending_tasks().is_empty());

        state.drain_events();
        assert!(state.dismiss_learn());
        assert!(state.learn.is_none());
        assert!(state.answers_enabled());
        assert!(!state.dismiss_learn());
    }

    #[test]
    fn test_learn_mode_correct_auto_dismisses() {
        let mut state = state(true);
        state.start_game();
        state.handle_answer(correct_index(&state));
        assert_eq!(state.pending_tasks(), vec![Task::DismissLearn]);

        // Manual dismiss cancels the timer
        assert!(state.dismiss_learn());
        assert!(state.pending_tasks().is_empty());
    }

    #[test]
    fn test_level_up_at_five() {
        let mut state = state(false);
        state.start_game();
        state.questions_answered = 5;
        state.drain_events();
        state.next_question();
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::LevelUp {
            category: Category::TruthyFalsy
        }));
        assert!(state.effects.level_up.is_some());
        assert_eq!(
            state.question.as_ref().map(|q| q.category),
            Some(Category::TruthyFalsy)
        );
    }

    #[test]
    fn test_victory_defers_unlimited_question() {
        let mut state = state(false);
        state.start_game();
        state.questions_answered = WIN_THRESHOLD;
        let before = state.question.clone().map(|q| q.expression);
        state.drain_events();

        state.next_question();
        assert_eq!(state.drain_events(), vec![GameEvent::Victory]);
        assert!(state.effects.victory.is_some());
        assert_eq!(state.question.clone().map(|q| q.expression), before);

        let tasks = state.pending_tasks();
        assert_eq!(tasks.len(), CELEBRATION_BURSTS as usize + 1);
        assert_eq!(tasks.last(), Some(&Task::SpawnQuestion(Category::Unlimited)));

        // Celebration is one-shot and a second call cannot jump the queue
        state.next_question();
        assert!(state.drain_events().is_empty());
        assert_eq!(state.question.clone().map(|q| q.expression), before);
        assert_eq!(state.pending_tasks().len(), CELEBRATION_BURSTS as usize + 1);

        // Exactly one unlimited question arrives, and it stays put
        for _ in 0..240 {
            crate::sim::step(&mut state);
        }
        let events = state.drain_events();
        assert_eq!(
            events,
            vec![GameEvent::QuestionSpawned {
                category: Category::Unlimited
            }]
        );
        let spawned = state.question.clone().map(|q| q.expression);
        for _ in 0..240 {
            crate::sim::step(&mut state);
        }
        assert_eq!(state.question.clone().map(|q| q.expression), spawned);
        assert!(state.answers_enabled());
    }

    #[test]
    fn test_return_to_menu_cancels_everything() {
        let mut state = state(false);
        state.start_game();
        state.lives = 1;
        state.handle_answer(wrong_index(&state));
        assert!(!state.pending_tasks().is_empty());

        state.return_to_menu();
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.pending_tasks().is_empty());
        assert!(state.expression.is_none());
        assert_eq!(state.lives, STARTING_LIVES);
    }

    #[test]
    fn test_move_player_only_while_playing() {
        let mut state = state(false);
        let before = state.player.target_x;
        state.move_player(10.0);
        assert_eq!(state.player.target_x, before);
        state.start_game();
        state.move_player(100.0);
        assert_eq!(state.player.target_x, 100.0);
    }

    #[test]
    fn test_resize_reclamps_player() {
        let mut state = state(false);
        state.start_game();
        state.move_player(780.0);
        state.resize(400.0, 300.0);
        assert_eq!(state.player.target_x, 400.0 - PLAYER_WIDTH / 2.0);
        assert_eq!(state.canvas, Vec2::new(400.0, 300.0));
    }
}
