//! PlayerSession - one participant's handle on a game.
//!
//! A [`PlayerSession`] is bound to one team. Everything it returns is
//! filtered through [`salvo_core::project`], so the opponent's ship layout
//! is never exposed; the two-sided view lives in
//! [`SpectatorSession`](crate::SpectatorSession) instead.
//!
//! # Example
//!
//! ```ignore
//! use salvo_client::{PlayerSession, SessionConfig};
//! use salvo_ledger::SqliteLedger;
//! use salvo_types::Team;
//!
//! let ledger = SqliteLedger::open(&path, SqliteLedger::DEFAULT_BUSY_TIMEOUT).await?;
//! let mut red = PlayerSession::new(ledger, Team::Red, SessionConfig::default());
//!
//! red.place_random_fleet(&mut rng).await?;
//! red.flip_coin(&mut rng).await?;
//!
//! loop {
//!     red.wait_for_change().await?;
//!     if red.can_act().await? {
//!         red.fire("D4".parse()?).await?;
//!     }
//! }
//! ```

use std::time::Duration;

use rand::Rng;
use salvo_core::{
    coin_flip, project, shot, Candidate, Observation, Projection, ShipPlacement, ShotTarget,
    TurnState, FLEET, MAX_PLACEMENT_ATTEMPTS,
};
use salvo_ledger::{Ledger, LedgerError};
use salvo_types::{Board, Coord, Orientation, ShotOutcome, Team, TurnToken, ValidationError};

use crate::error::{EngineError, EngineResult};
use crate::poll::{Poller, DEFAULT_POLL_INTERVAL};

/// Configuration shared by player and spectator sessions.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Sleep between unchanged fingerprint reads.
    pub poll_interval: Duration,
}

impl SessionConfig {
    /// Set the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// One team's view of and moves in a shared game.
pub struct PlayerSession<L: Ledger> {
    ledger: L,
    team: Team,
    poller: Poller,
}

impl<L: Ledger> PlayerSession<L> {
    /// Create a session for `team` over `ledger`.
    pub fn new(ledger: L, team: Team, config: SessionConfig) -> Self {
        Self {
            ledger,
            team,
            poller: Poller::new(config.poll_interval),
        }
    }

    /// The team this session plays.
    pub fn team(&self) -> Team {
        self.team
    }

    /// This team's private view of the latest snapshot.
    pub async fn project(&self) -> EngineResult<Projection> {
        let cells = self.ledger.cells().await?;
        Ok(project(&cells, self.team))
    }

    /// Current turn arbitration.
    pub async fn turn(&self) -> EngineResult<TurnState> {
        let tokens = self.ledger.tokens().await?;
        Ok(TurnState::from_tokens(&tokens))
    }

    /// Whether this team's coin flip is already recorded.
    pub async fn has_flipped(&self) -> EngineResult<bool> {
        let tokens = self.ledger.tokens().await?;
        Ok(tokens.iter().any(|token| token.team == self.team))
    }

    /// Whether this team may fire now.
    pub async fn can_act(&self) -> EngineResult<bool> {
        Ok(self.turn().await?.can_act(self.team))
    }

    /// Fire at `coord`.
    ///
    /// The turn and re-fire checks run against the latest snapshot first and
    /// again inside the commit, so a losing racer is rejected rather than
    /// recorded.
    pub async fn fire(&self, coord: Coord) -> EngineResult<ShotOutcome> {
        let target = ShotTarget::new(self.team, coord);
        let turn = self.turn().await?;
        let existing = self.ledger.cell(target.shot_board(), coord).await?;

        if let Err(e) = shot::validate(target, turn, existing.as_ref()) {
            tracing::warn!("{} shot at {} rejected: {}", self.team, coord, e);
            return Err(e.into());
        }

        match self.ledger.commit_shot(target).await {
            Ok(outcome) => {
                tracing::info!("{} fired {}: {}", self.team, coord, outcome);
                Ok(outcome)
            }
            Err(e @ LedgerError::Rejected(_)) => {
                tracing::warn!("{} shot at {} lost a race: {}", self.team, coord, e);
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Fire at raw coordinates, rejecting anything off the grid.
    pub async fn fire_at(&self, x: i32, y: i32) -> EngineResult<ShotOutcome> {
        self.fire(Coord::new(x, y)?).await
    }

    /// Validate and write one ship.
    ///
    /// Rejects non-ship boards, the opponent's board, out-of-range starts
    /// and lengths, ships that run past the edge, and any placement after
    /// both coin flips. A collision with any recorded cell writes nothing
    /// and returns [`EngineError::Conflict`].
    pub async fn place_ship(
        &self,
        board: Board,
        x: i32,
        y: i32,
        length: i32,
        orientation: Orientation,
    ) -> EngineResult<ShipPlacement> {
        let placement = ShipPlacement::validate(board, x, y, length, orientation)?;
        if board != Board::ships(self.team) {
            return Err(ValidationError::NotYourBoard {
                team: self.team,
                board,
            }
            .into());
        }
        self.ensure_placement_open().await?;
        self.ledger.place_segments(&placement).await?;
        tracing::debug!(
            "{} placed ship of length {} at {}",
            self.team,
            placement.length(),
            placement.origin()
        );
        Ok(placement)
    }

    /// Place the standard fleet at random positions on this team's board.
    ///
    /// Each ship gets at most [`MAX_PLACEMENT_ATTEMPTS`] draws. Candidates
    /// that run off the board or touch a recorded cell are redrawn.
    pub async fn place_random_fleet<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> EngineResult<Vec<ShipPlacement>> {
        self.ensure_placement_open().await?;
        let board = Board::ships(self.team);
        let mut placed = Vec::with_capacity(FLEET.len());

        for &length in FLEET.iter() {
            placed.push(self.place_random_ship(board, length, rng).await?);
        }

        tracing::info!("{} fleet placed ({} ships)", self.team, placed.len());
        Ok(placed)
    }

    async fn place_random_ship<R: Rng + ?Sized>(
        &self,
        board: Board,
        length: u8,
        rng: &mut R,
    ) -> EngineResult<ShipPlacement> {
        for attempt in 1..=MAX_PLACEMENT_ATTEMPTS {
            let Ok(placement) = Candidate::draw(rng, length).validate(board) else {
                continue;
            };

            if !self.is_clear(&placement).await? {
                continue;
            }

            match self.ledger.place_segments(&placement).await {
                Ok(()) => {
                    tracing::debug!(
                        "Placed {} ship of length {} at {} after {} attempt(s)",
                        board,
                        length,
                        placement.origin(),
                        attempt
                    );
                    return Ok(placement);
                }
                // Someone wrote the cell between the check and the commit.
                Err(LedgerError::Conflict { .. }) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(EngineError::Conflict(format!(
            "no free position for a ship of length {length} on {board} after {MAX_PLACEMENT_ATTEMPTS} attempts"
        )))
    }

    async fn ensure_placement_open(&self) -> EngineResult<()> {
        if self.turn().await?.is_started() {
            return Err(ValidationError::PlacementClosed.into());
        }
        Ok(())
    }

    async fn is_clear(&self, placement: &ShipPlacement) -> EngineResult<bool> {
        for &coord in placement.segments() {
            if self.ledger.cell(placement.board(), coord).await?.is_some() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Draw and record this team's turn priority.
    ///
    /// The token doubles as "fleet ready": flip after placing, since the game
    /// starts, and placement closes, once both teams have flipped. Fails with
    /// [`EngineError::Conflict`] if the team already flipped.
    pub async fn flip_coin<R: Rng + ?Sized>(&self, rng: &mut R) -> EngineResult<f64> {
        let priority = coin_flip(rng);
        self.ledger
            .insert_token(TurnToken::new(self.team, priority))
            .await?;
        tracing::info!("{} flipped {:.3}", self.team, priority);
        Ok(priority)
    }

    /// Read the fingerprint once, sleeping if nothing changed.
    pub async fn poll(&mut self) -> EngineResult<Observation> {
        self.poller.poll(&self.ledger).await
    }

    /// Wait for the next distinguishable snapshot.
    pub async fn wait_for_change(&mut self) -> EngineResult<()> {
        self.poller.wait_for_change(&self.ledger).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use salvo_ledger::SqliteLedger;
    use salvo_types::CellState;

    fn config() -> SessionConfig {
        SessionConfig::default().with_poll_interval(Duration::from_millis(1))
    }

    fn at(x: i32, y: i32) -> Coord {
        Coord::new(x, y).unwrap()
    }

    async fn pair() -> (
        SqliteLedger,
        PlayerSession<SqliteLedger>,
        PlayerSession<SqliteLedger>,
    ) {
        let ledger = SqliteLedger::in_memory().await.unwrap();
        let red = PlayerSession::new(ledger.clone(), Team::Red, config());
        let blue = PlayerSession::new(ledger.clone(), Team::Blue, config());
        (ledger, red, blue)
    }

    async fn tokens(ledger: &SqliteLedger, red: f64, blue: f64) {
        ledger
            .insert_token(TurnToken::new(Team::Red, red))
            .await
            .unwrap();
        ledger
            .insert_token(TurnToken::new(Team::Blue, blue))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn nobody_acts_before_both_flip() {
        let (_ledger, red, blue) = pair().await;
        let mut rng = StdRng::seed_from_u64(1);
        red.flip_coin(&mut rng).await.unwrap();

        assert_eq!(red.turn().await.unwrap(), TurnState::NotStarted);
        assert!(!red.can_act().await.unwrap());
        assert!(!blue.can_act().await.unwrap());

        let err = red.fire(at(0, 0)).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Validation(ValidationError::GameNotStarted)
        ));
    }

    #[tokio::test]
    async fn exactly_one_side_acts_after_both_flip() {
        let (_ledger, red, blue) = pair().await;
        let mut rng = StdRng::seed_from_u64(7);
        red.flip_coin(&mut rng).await.unwrap();
        blue.flip_coin(&mut rng).await.unwrap();

        let red_turn = red.can_act().await.unwrap();
        let blue_turn = blue.can_act().await.unwrap();
        assert!(red_turn ^ blue_turn);
    }

    #[tokio::test]
    async fn second_flip_is_a_conflict() {
        let (_ledger, red, blue) = pair().await;
        let mut rng = StdRng::seed_from_u64(3);
        assert!(!red.has_flipped().await.unwrap());
        red.flip_coin(&mut rng).await.unwrap();
        assert!(red.has_flipped().await.unwrap());
        assert!(!blue.has_flipped().await.unwrap());

        let err = red.flip_coin(&mut rng).await.unwrap_err();
        assert!(matches!(err, EngineError::Conflict(_)));
    }

    #[tokio::test]
    async fn turns_alternate() {
        let (ledger, red, blue) = pair().await;
        tokens(&ledger, 0.3, 0.7).await;

        assert!(blue.can_act().await.unwrap());
        assert!(!red.can_act().await.unwrap());

        blue.fire(at(5, 5)).await.unwrap();

        let after = ledger.tokens().await.unwrap();
        assert!(after.contains(&TurnToken::new(Team::Red, 0.9)));
        assert!(after.contains(&TurnToken::new(Team::Blue, 0.1)));
        assert!(red.can_act().await.unwrap());
        assert!(!blue.can_act().await.unwrap());
    }

    #[tokio::test]
    async fn tie_goes_to_red() {
        let (ledger, red, blue) = pair().await;
        tokens(&ledger, 0.5, 0.5).await;
        assert!(red.can_act().await.unwrap());
        assert!(!blue.can_act().await.unwrap());
    }

    #[tokio::test]
    async fn out_of_turn_fire_is_rejected() {
        let (ledger, red, _blue) = pair().await;
        tokens(&ledger, 0.3, 0.7).await;

        let err = red.fire(at(1, 1)).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Validation(ValidationError::NotYourTurn(Team::Red))
        ));
        assert!(red.project().await.unwrap().own_shots.is_empty());
    }

    #[tokio::test]
    async fn hit_shows_on_both_sides() {
        let (ledger, red, blue) = pair().await;
        blue.place_ship(Board::BlueShips, 3, 4, 3, Orientation::Vertical)
            .await
            .unwrap();
        tokens(&ledger, 0.7, 0.3).await;

        assert_eq!(red.fire(at(3, 4)).await.unwrap(), ShotOutcome::Hit);

        let red_view = red.project().await.unwrap();
        assert_eq!(red_view.own_shots[&at(3, 4)], CellState::Hit);
        assert_eq!(red_view.hits_scored(), 1);

        let blue_view = blue.project().await.unwrap();
        assert_eq!(blue_view.own_ships[&at(3, 4)], CellState::Hit);
        assert_eq!(blue_view.incoming_shots[&at(3, 4)], CellState::Hit);
        assert_eq!(blue_view.remaining_ship_cells(), 2);
    }

    #[tokio::test]
    async fn miss_only_touches_the_shot_board() {
        let (ledger, red, blue) = pair().await;
        tokens(&ledger, 0.7, 0.3).await;

        assert_eq!(red.fire_at(9, 9).await.unwrap(), ShotOutcome::Miss);
        assert_eq!(
            red.project().await.unwrap().own_shots[&at(9, 9)],
            CellState::Miss
        );
        assert!(blue.project().await.unwrap().own_ships.is_empty());
    }

    #[tokio::test]
    async fn refire_is_rejected() {
        let (ledger, red, blue) = pair().await;
        tokens(&ledger, 0.7, 0.3).await;
        red.fire(at(2, 2)).await.unwrap();
        blue.fire(at(8, 8)).await.unwrap();

        let err = red.fire(at(2, 2)).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Validation(ValidationError::AlreadyFired { team: Team::Red, .. })
        ));
    }

    #[tokio::test]
    async fn off_grid_fire_is_rejected() {
        let (ledger, red, _blue) = pair().await;
        tokens(&ledger, 0.7, 0.3).await;

        let err = red.fire_at(10, 0).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Validation(ValidationError::OutOfBounds { x: 10, y: 0 })
        ));
    }

    #[tokio::test]
    async fn placement_grid() {
        let (ledger, red, _blue) = pair().await;
        let h = Orientation::Horizontal;
        let v = Orientation::Vertical;

        assert!(red.place_ship(Board::RedShips, 0, 0, 5, h).await.is_ok());
        assert!(red.place_ship(Board::RedShips, 0, 2, 4, v).await.is_ok());
        let placed = ledger.cells().await.unwrap();
        assert_eq!(placed.len(), 9);

        // Runs past the literal edge.
        assert!(matches!(
            red.place_ship(Board::RedShips, 5, 9, 5, h).await,
            Err(EngineError::Validation(ValidationError::DoesNotFit { .. }))
        ));
        // Not a ship board.
        assert!(matches!(
            red.place_ship(Board::RedShots, 0, 0, 2, h).await,
            Err(EngineError::Validation(ValidationError::NotAShipBoard(_)))
        ));
        for bad in [1, 6] {
            assert!(matches!(
                red.place_ship(Board::RedShips, 7, 7, bad, h).await,
                Err(EngineError::Validation(ValidationError::InvalidLength(_)))
            ));
        }
        // Every rejection above committed nothing.
        assert_eq!(ledger.cells().await.unwrap(), placed);
    }

    #[tokio::test]
    async fn rejected_placement_commits_zero_cells() {
        let (ledger, red, _blue) = pair().await;
        let h = Orientation::Horizontal;

        for (x, length) in [(5, 5), (8, 2), (7, 1), (7, 6)] {
            assert!(red.place_ship(Board::RedShips, x, 0, length, h).await.is_err());
        }
        assert!(ledger.cells().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn session_only_places_on_its_own_board() {
        let (ledger, red, _blue) = pair().await;

        let err = red
            .place_ship(Board::BlueShips, 0, 0, 5, Orientation::Horizontal)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Validation(ValidationError::NotYourBoard {
                team: Team::Red,
                board: Board::BlueShips,
            })
        ));
        assert!(ledger.cells().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fleets_are_fixed_once_both_flip() {
        let (ledger, red, blue) = pair().await;
        let mut rng = StdRng::seed_from_u64(21);
        red.place_random_fleet(&mut rng).await.unwrap();
        tokens(&ledger, 0.8, 0.2).await;

        // Red fires at an empty blue board...
        assert_eq!(red.fire(at(3, 4)).await.unwrap(), ShotOutcome::Miss);

        // ...and blue cannot slip a ship under the recorded miss.
        let err = blue
            .place_ship(Board::BlueShips, 3, 4, 3, Orientation::Horizontal)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Validation(ValidationError::PlacementClosed)
        ));
        let err = blue.place_random_fleet(&mut rng).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Validation(ValidationError::PlacementClosed)
        ));

        assert!(blue.project().await.unwrap().own_ships.is_empty());
        assert!(ledger.cell(Board::BlueShips, at(3, 4)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn placement_stays_open_until_the_second_flip() {
        let (_ledger, red, blue) = pair().await;
        let mut rng = StdRng::seed_from_u64(22);
        red.place_random_fleet(&mut rng).await.unwrap();
        red.flip_coin(&mut rng).await.unwrap();

        blue.place_random_fleet(&mut rng).await.unwrap();
        blue.flip_coin(&mut rng).await.unwrap();

        assert!(red.turn().await.unwrap().is_started());
        assert_eq!(blue.project().await.unwrap().remaining_ship_cells(), 17);
    }

    #[tokio::test]
    async fn collision_commits_nothing() {
        let (ledger, red, _blue) = pair().await;
        red.place_ship(Board::RedShips, 2, 0, 3, Orientation::Vertical)
            .await
            .unwrap();

        let err = red
            .place_ship(Board::RedShips, 0, 1, 4, Orientation::Horizontal)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Conflict(_)));
        assert_eq!(ledger.cells().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn random_fleet_fills_seventeen_cells() {
        let (_ledger, red, blue) = pair().await;
        let mut rng = StdRng::seed_from_u64(42);

        let red_fleet = red.place_random_fleet(&mut rng).await.unwrap();
        blue.place_random_fleet(&mut rng).await.unwrap();

        let lengths: Vec<u8> = red_fleet.iter().map(|p| p.length()).collect();
        assert_eq!(lengths, FLEET.to_vec());
        assert!(red_fleet.iter().all(|p| p.board() == Board::RedShips));

        let red_view = red.project().await.unwrap();
        let blue_view = blue.project().await.unwrap();
        assert_eq!(red_view.remaining_ship_cells(), 17);
        assert_eq!(blue_view.remaining_ship_cells(), 17);
    }

    #[tokio::test]
    async fn random_fleet_gives_up_on_a_full_board() {
        let (_ledger, red, _blue) = pair().await;
        // Only column 9 stays free, far too little for a whole fleet.
        for y in 0..10 {
            red.place_ship(Board::RedShips, 0, y, 5, Orientation::Horizontal)
                .await
                .unwrap();
            red.place_ship(Board::RedShips, 5, y, 4, Orientation::Horizontal)
                .await
                .unwrap();
        }

        let mut rng = StdRng::seed_from_u64(9);
        let err = red.place_random_fleet(&mut rng).await.unwrap_err();
        assert!(matches!(err, EngineError::Conflict(_)));
    }

    #[tokio::test]
    async fn projection_hides_the_opponent() {
        let (_ledger, red, blue) = pair().await;
        let mut rng = StdRng::seed_from_u64(5);
        blue.place_random_fleet(&mut rng).await.unwrap();

        let view = red.project().await.unwrap();
        assert!(view.own_ships.is_empty());
        assert!(view.incoming_shots.is_empty());
        assert!(view.own_shots.is_empty());
        assert_eq!(red.project().await.unwrap(), view);
    }

    #[tokio::test]
    async fn opponent_move_wakes_the_waiting_side() {
        let (ledger, mut red, blue) = pair().await;
        tokens(&ledger, 0.3, 0.7).await;
        red.poll().await.unwrap();

        let mover = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            blue.fire(at(4, 4)).await.unwrap();
        };
        let (woke, ()) = tokio::join!(red.wait_for_change(), mover);
        woke.unwrap();
        assert!(red.can_act().await.unwrap());
    }
}
