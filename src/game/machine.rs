//! The turn state machine.
//!
//! `step` is the only way a game moves forward. It validates the action
//! against the phase and the actor, applies it to a copy of the state, and
//! returns the new state with the events it produced. A rejected action
//! leaves the caller's state untouched.
//!
//! Phase flow:
//! - Roll       -> Move
//! - Move       -> turn end (START or own land), LandAction (free or enemy land)
//! - LandAction -> turn end (summon, pass, pay), Battle (fight)
//! - Battle     -> turn end (acknowledged)
//! - turn end   -> Roll for the next player, or GameOver

use super::action::{Action, GameError};
use super::event::{Event, LogEntry};
use super::random::Randomness;
use super::state::{BattlePhase, BattleState, GameState, Phase};
use crate::board::{BoardError, PlayerId};
use crate::policy::{choose_attacker, choose_summon, fight_or_pay, TollChoice};
use crate::resolve::{
    advance_position, apply_lap_bonus, apply_toll, classify_arrival, compute_toll, is_winner,
    next_player, resolve_battle, Arrival, BattleResult,
};

/// Applies `action`, taken by `actor`, to `state`.
pub fn step<R: Randomness + ?Sized>(
    state: &GameState,
    actor: PlayerId,
    action: Action,
    rnd: &mut R,
) -> Result<(GameState, Vec<Event>), GameError> {
    check_actor(state, actor, action)?;

    let mut t = Transition {
        state: state.clone(),
        events: Vec::new(),
    };
    match action {
        Action::Roll => t.roll(rnd)?,
        Action::Move => t.advance(rnd)?,
        Action::Summon { hand_index } => t.summon(hand_index)?,
        Action::Pass => t.pass()?,
        Action::PayToll => t.pay_toll()?,
        Action::Fight { hand_index } => t.fight(hand_index)?,
        Action::Acknowledge => t.acknowledge()?,
    }

    debug_assert_eq!(t.state.check_invariants(), Ok(()));
    log::debug!(
        "turn {}: {} by {} -> {} ({} events)",
        state.turn,
        action,
        actor,
        t.state.phase,
        t.events.len()
    );
    Ok((t.state, t.events))
}

impl GameState {
    /// Applies an action in place. On error the state is unchanged.
    pub fn apply<R: Randomness + ?Sized>(
        &mut self,
        actor: PlayerId,
        action: Action,
        rnd: &mut R,
    ) -> Result<Vec<Event>, GameError> {
        let (next, events) = step(self, actor, action, rnd)?;
        *self = next;
        Ok(events)
    }
}

fn check_actor(state: &GameState, actor: PlayerId, action: Action) -> Result<(), GameError> {
    if state.is_over() {
        return Err(GameError::GameOver);
    }
    let player = state.player(actor).ok_or(GameError::NoSuchPlayer(actor))?;
    // Either seat may dismiss a battle.
    if action == Action::Acknowledge {
        return Ok(());
    }
    if actor != state.current {
        return Err(GameError::NotYourTurn {
            player: actor,
            active: state.current,
        });
    }
    if action.is_land_decision() && player.is_cpu() {
        return Err(GameError::CpuControlled(actor));
    }
    Ok(())
}

/// Borrows two distinct elements mutably.
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

/// A state being transformed by one action.
struct Transition {
    state: GameState,
    events: Vec<Event>,
}

impl Transition {
    fn emit(&mut self, event: Event) {
        let message = event.describe(&self.state.players);
        self.state.log.push(LogEntry {
            turn: self.state.turn,
            kind: event.kind(),
            message,
        });
        self.events.push(event);
    }

    fn expect_phase(&self, phase: Phase, action: &'static str) -> Result<(), GameError> {
        if self.state.phase == phase {
            Ok(())
        } else {
            Err(GameError::WrongPhase {
                action,
                phase: self.state.phase,
            })
        }
    }

    fn position(&self) -> usize {
        self.state.current_player().position
    }

    /// Owner of the enemy tile underfoot.
    fn enemy_owner(&self) -> Result<PlayerId, GameError> {
        let position = self.position();
        match classify_arrival(self.state.board.tile(position)?, self.state.current) {
            Arrival::Enemy(owner) => Ok(owner),
            _ => Err(GameError::NotEnemyTile(position)),
        }
    }

    fn roll<R: Randomness + ?Sized>(&mut self, rnd: &mut R) -> Result<(), GameError> {
        self.expect_phase(Phase::Roll, "roll")?;
        let value = rnd.roll_die();
        self.state.dice = Some(value);
        self.state.phase = Phase::Move;
        self.emit(Event::Rolled {
            player: self.state.current,
            value,
        });
        Ok(())
    }

    fn advance<R: Randomness + ?Sized>(&mut self, rnd: &mut R) -> Result<(), GameError> {
        self.expect_phase(Phase::Move, "move")?;
        let steps = self.state.dice.ok_or(GameError::WrongPhase {
            action: "move",
            phase: Phase::Move,
        })?;
        let id = self.state.current;
        let bonus = self.state.config.lap_bonus;
        let movement = advance_position(self.position(), usize::from(steps), self.state.board.len());

        // The lap is credited before the new position is committed.
        if movement.wrapped {
            apply_lap_bonus(self.state.current_player_mut(), bonus);
            self.emit(Event::LapCompleted { player: id, bonus });
        }
        self.state.current_player_mut().position = movement.to;
        self.emit(Event::Moved {
            player: id,
            from: movement.from,
            to: movement.to,
        });
        self.arrive(rnd)
    }

    fn arrive<R: Randomness + ?Sized>(&mut self, rnd: &mut R) -> Result<(), GameError> {
        let id = self.state.current;
        let position = self.position();
        let (arrival, toll) = {
            let tile = self.state.board.tile(position)?;
            (classify_arrival(tile, id), compute_toll(tile))
        };

        match arrival {
            Arrival::Start => self.end_turn(),
            Arrival::Unowned => {
                self.state.phase = Phase::LandAction;
                if self.state.current_player().is_cpu() {
                    self.cpu_claim()
                } else {
                    Ok(())
                }
            }
            Arrival::Own => {
                if self.state.board.heal_occupant(position)? {
                    let creature = self
                        .state
                        .board
                        .tile(position)?
                        .creature
                        .as_ref()
                        .map(|c| c.name.clone())
                        .unwrap_or_default();
                    self.emit(Event::Healed {
                        player: id,
                        tile: position,
                        creature,
                    });
                }
                self.end_turn()
            }
            Arrival::Enemy(owner) => {
                self.state.phase = Phase::LandAction;
                self.state.pending_toll = Some(toll);
                self.emit(Event::TollDue {
                    payer: id,
                    owner,
                    amount: toll,
                });
                if self.state.current_player().hand.is_empty() {
                    return self.settle_toll(owner, toll);
                }
                if !self.state.current_player().is_cpu() {
                    return Ok(());
                }
                let threshold = self.state.config.cpu_fight_toll_threshold;
                match fight_or_pay(toll, threshold, rnd) {
                    TollChoice::Fight => {
                        let idx = choose_attacker(&self.state.current_player().hand)
                            .ok_or(GameError::EmptyHand)?;
                        self.battle(idx, owner)
                    }
                    TollChoice::Pay => self.settle_toll(owner, toll),
                }
            }
        }
    }

    fn cpu_claim(&mut self) -> Result<(), GameError> {
        let player = self.state.current_player();
        match choose_summon(&player.hand, player.mana) {
            Some(idx) => self.claim(idx),
            None => {
                self.emit(Event::Declined {
                    player: self.state.current,
                });
                self.end_turn()
            }
        }
    }

    fn summon(&mut self, hand_index: usize) -> Result<(), GameError> {
        self.expect_phase(Phase::LandAction, "summon")?;
        let position = self.position();
        if self.state.board.tile(position)?.owner.is_some() {
            return Err(BoardError::TileOwned(position).into());
        }
        self.claim(hand_index)
    }

    /// Spends a hand card and its cost to claim the tile underfoot.
    fn claim(&mut self, hand_index: usize) -> Result<(), GameError> {
        let id = self.state.current;
        let position = self.position();
        let player = self.state.current_player_mut();
        let cost = player
            .hand
            .get(hand_index)
            .map(|c| c.cost)
            .ok_or(GameError::NoSuchCard(hand_index))?;
        if player.mana < cost {
            return Err(GameError::InsufficientMana {
                cost,
                mana: player.mana,
            });
        }
        let card = player
            .take_card(hand_index)
            .ok_or(GameError::NoSuchCard(hand_index))?;
        player.mana -= cost;
        let name = card.name.clone();
        self.state.board.claim(position, id, card)?;
        self.emit(Event::Summoned {
            player: id,
            card: name,
            tile: position,
            cost,
        });
        self.end_turn()
    }

    fn pass(&mut self) -> Result<(), GameError> {
        self.expect_phase(Phase::LandAction, "pass")?;
        if self.enemy_owner().is_ok() {
            return Err(GameError::MustPayOrFight(self.position()));
        }
        self.emit(Event::Declined {
            player: self.state.current,
        });
        self.end_turn()
    }

    fn pay_toll(&mut self) -> Result<(), GameError> {
        self.expect_phase(Phase::LandAction, "pay")?;
        let owner = self.enemy_owner()?;
        let toll = match self.state.pending_toll {
            Some(t) => t,
            None => compute_toll(self.state.current_tile()),
        };
        self.settle_toll(owner, toll)
    }

    fn settle_toll(&mut self, owner: PlayerId, toll: u32) -> Result<(), GameError> {
        let id = self.state.current;
        let (payer, receiver) = pair_mut(&mut self.state.players, id.0, owner.0);
        let payment = apply_toll(payer, receiver, toll);
        self.emit(Event::TollPaid {
            payer: id,
            owner,
            owed: payment.owed,
            paid: payment.paid,
            bankrupt: payment.bankrupt,
        });
        self.end_turn()
    }

    fn fight(&mut self, hand_index: usize) -> Result<(), GameError> {
        self.expect_phase(Phase::LandAction, "fight")?;
        let owner = self.enemy_owner()?;
        let hand = &self.state.current_player().hand;
        if hand.is_empty() {
            return Err(GameError::EmptyHand);
        }
        if hand_index >= hand.len() {
            return Err(GameError::NoSuchCard(hand_index));
        }
        self.battle(hand_index, owner)
    }

    /// Commits a hand card against the occupant underfoot and applies the
    /// outcome. The committed card leaves the hand whatever happens.
    fn battle(&mut self, hand_index: usize, defender: PlayerId) -> Result<(), GameError> {
        let id = self.state.current;
        let position = self.position();
        let (terrain, defender_card) = {
            let tile = self.state.board.tile(position)?;
            let card = tile.creature.clone().ok_or(BoardError::Vacant(position))?;
            (tile.kind, card)
        };
        let attacker_card = self
            .state
            .current_player_mut()
            .take_card(hand_index)
            .ok_or(GameError::NoSuchCard(hand_index))?;

        let outcome = resolve_battle(
            &attacker_card,
            &defender_card,
            terrain,
            self.state.config.terrain_bonus,
        );

        self.emit(Event::BattleStarted {
            attacker: id,
            defender,
            tile: position,
            attacker_card: attacker_card.name.clone(),
            defender_card: defender_card.name.clone(),
        });
        let mut log = vec![format!("Battle started at Tile {}!", position)];
        for line in &outcome.log {
            log.push(line.clone());
            self.emit(Event::BattleNarration { line: line.clone() });
        }

        match outcome.result {
            BattleResult::Win => self
                .state
                .board
                .conquer(position, id, outcome.occupant.clone())?,
            BattleResult::Loss | BattleResult::Draw => self
                .state
                .board
                .set_occupant_hp(position, outcome.defender_hp)?,
        }

        let ended = Event::BattleEnded {
            attacker: id,
            tile: position,
            result: outcome.result,
        };
        log.push(ended.describe(&self.state.players));
        self.emit(ended);

        self.state.battle = Some(BattleState {
            attacker: id,
            defender,
            attacker_card,
            defender_card,
            tile: position,
            log,
            phase: BattlePhase::End,
            result: Some(outcome.result),
        });
        self.state.pending_toll = None;
        self.state.phase = Phase::Battle;
        Ok(())
    }

    fn acknowledge(&mut self) -> Result<(), GameError> {
        self.expect_phase(Phase::Battle, "ack")?;
        self.state.battle = None;
        self.end_turn()
    }

    /// Shared epilogue of every turn.
    fn end_turn(&mut self) -> Result<(), GameError> {
        let id = self.state.current;
        self.state.dice = None;
        self.state.pending_toll = None;

        if is_winner(self.state.current_player(), &self.state.config) {
            let mana = self.state.current_player().mana;
            self.state.winner = Some(id);
            self.state.phase = Phase::GameOver;
            log::info!(
                "{} wins on turn {} with {} mana",
                self.state.current_player().name,
                self.state.turn,
                mana
            );
            self.emit(Event::GameWon { player: id, mana });
            return Ok(());
        }

        let max_hand = self.state.config.max_hand_size;
        if self.state.current_player_mut().draw(max_hand).is_some() {
            self.emit(Event::CardDrawn { player: id });
        }

        let snapshot = self.state.mana_snapshot(self.state.turn + 1);
        self.state.mana_history.push(snapshot);

        let next = next_player(id, self.state.players.len());
        self.state.current = next;
        self.state.turn += 1;
        self.state.phase = Phase::Roll;
        self.emit(Event::TurnStarted {
            player: next,
            turn: self.state.turn,
        });
        Ok(())
    }
}
