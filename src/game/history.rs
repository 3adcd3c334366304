use crate::game::Move;

/// Moves played so far in one match. Index 0 holds player A's moves, index 1
/// player B's.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    moves: [Vec<Move>; 2],
}

impl History {
    pub fn with_rounds(rounds: usize) -> History {
        History {
            moves: [Vec::with_capacity(rounds), Vec::with_capacity(rounds)],
        }
    }

    pub fn record(&mut self, a: Move, b: Move) {
        self.moves[0].push(a);
        self.moves[1].push(b);
    }

    pub fn rounds(&self) -> usize {
        self.moves[0].len()
    }

    pub fn moves_of(&self, player: usize) -> &[Move] {
        &self.moves[player]
    }

    pub fn view_for_a(&self) -> HistoryView<'_> {
        HistoryView::new(&self.moves[0], &self.moves[1])
    }

    pub fn view_for_b(&self) -> HistoryView<'_> {
        HistoryView::new(&self.moves[1], &self.moves[0])
    }
}

/// One player's view of a match before it moves: its own moves first, then
/// the opponent's. Only rounds that were already played are visible, so the
/// current round index is the length of either slice.
#[derive(Clone, Copy, Debug)]
pub struct HistoryView<'a> {
    own: &'a [Move],
    opponent: &'a [Move],
}

impl<'a> HistoryView<'a> {
    pub fn new(own: &'a [Move], opponent: &'a [Move]) -> HistoryView<'a> {
        assert_eq!(
            own.len(),
            opponent.len(),
            "both players must have played the same number of rounds"
        );
        HistoryView { own, opponent }
    }

    #[inline]
    pub fn round(&self) -> usize {
        self.own.len()
    }

    pub fn own(&self) -> &'a [Move] {
        self.own
    }

    pub fn opponent(&self) -> &'a [Move] {
        self.opponent
    }

    /// Own move `back` rounds ago (`back >= 1`).
    #[inline]
    pub fn own_back(&self, back: usize) -> Move {
        self.own[self.round() - back]
    }

    #[inline]
    pub fn opponent_back(&self, back: usize) -> Move {
        self.opponent[self.round() - back]
    }

    pub fn opponent_defections(&self) -> usize {
        self.opponent.iter().filter(|&&m| m == Move::Defect).count()
    }

    pub fn opponent_ever_defected(&self) -> bool {
        self.opponent.contains(&Move::Defect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_views_swap_players() {
        let mut history = History::with_rounds(3);
        history.record(Move::Cooperate, Move::Defect);
        history.record(Move::Defect, Move::Defect);

        let a = history.view_for_a();
        let b = history.view_for_b();
        assert_eq!(a.round(), 2);
        assert_eq!(a.own_back(1), Move::Defect);
        assert_eq!(a.own_back(2), Move::Cooperate);
        assert_eq!(a.opponent_defections(), 2);
        assert_eq!(b.own(), history.moves_of(1));
        assert_eq!(b.opponent(), history.moves_of(0));
        assert_eq!(b.opponent_defections(), 1);
    }

    #[test]
    fn test_empty_view() {
        let history = History::with_rounds(10);
        let view = history.view_for_a();
        assert_eq!(view.round(), 0);
        assert!(!view.opponent_ever_defected());
    }

    #[test]
    #[should_panic(expected = "same number of rounds")]
    fn test_mismatched_view_panics() {
        HistoryView::new(&[Move::Cooperate], &[]);
    }
}
