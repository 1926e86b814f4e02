use super::{Policy, PolicyContext};
use bigtwo_core::model::combination::Combination;
use bigtwo_core::search::{Decomposition, SearchMode, decompose};
use tracing::{Level, event};

/// Sheds the largest shape it can when leading and the cheapest stronger
/// match when following. Stateless: the hand is searched fresh every turn.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPolicy;

impl GreedyPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl Policy for GreedyPolicy {
    fn choose_play(&mut self, ctx: &PolicyContext) -> Combination {
        if ctx.hand.is_empty() {
            return Combination::pass();
        }

        let mut found = decompose(ctx.hand, SearchMode::Commit);
        if let Some(card) = ctx.forced_card {
            found.retain_containing(card);
        }

        let (choice, reason) = if ctx.is_lead() {
            lead(ctx, &found)
        } else {
            follow(ctx, &found)
        };
        log_play_decision(ctx, &found, &choice, reason);
        choice
    }
}

/// Lists are weakest first, so index 0 is the cheapest of each shape.
fn lead(ctx: &PolicyContext, found: &Decomposition) -> (Combination, &'static str) {
    let by_priority = [
        (found.poker_hands(), "lead_poker_hand"),
        (found.triples(), "lead_triple"),
        (found.doubles(), "lead_double"),
        (found.singles(), "lead_single"),
    ];
    for (candidates, reason) in by_priority {
        if let Some(first) = candidates.first() {
            return (first.clone(), reason);
        }
    }

    // Sorted order puts a forced Three of Diamonds first.
    match ctx.hand.iter().min() {
        Some(card) => (Combination::single(*card), "lead_lowest_card"),
        None => (Combination::pass(), "empty_hand"),
    }
}

fn follow(ctx: &PolicyContext, found: &Decomposition) -> (Combination, &'static str) {
    let target = ctx.previous_play.value();
    found
        .candidates_for(ctx.previous_play.len())
        .iter()
        .find(|candidate| candidate.value() > target)
        .map(|candidate| (candidate.clone(), "follow_cheapest_stronger"))
        .unwrap_or_else(|| (Combination::pass(), "pass_no_stronger"))
}

fn log_play_decision(
    ctx: &PolicyContext,
    found: &Decomposition,
    chosen: &Combination,
    reason: &str,
) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    let forced = ctx
        .forced_card
        .map(|card| card.to_string())
        .unwrap_or_else(|| "-".to_string());

    event!(
        target: "bigtwo_bot::play",
        Level::INFO,
        seat = %ctx.seat,
        hand_size = ctx.hand.len(),
        poker_hands = found.poker_hands().len(),
        triples = found.triples().len(),
        doubles = found.doubles().len(),
        singles = found.singles().len(),
        previous = %ctx.previous_play,
        forced = %forced,
        chosen = %chosen,
        reason,
    );
}

#[cfg(test)]
mod tests {
    use super::GreedyPolicy;
    use crate::policy::{Policy, PolicyContext};
    use bigtwo_core::model::card::Card;
    use bigtwo_core::model::combination::{Combination, CombinationKind, PokerHandKind};
    use bigtwo_core::model::rank::Rank;
    use bigtwo_core::model::seat::Seat;
    use bigtwo_core::model::suit::Suit;

    fn c(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    fn choose(hand: &[Card], previous_play: &Combination, forced_card: Option<Card>) -> Combination {
        let ctx = PolicyContext {
            seat: Seat::South,
            hand,
            previous_play,
            forced_card,
        };
        GreedyPolicy::new().choose_play(&ctx)
    }

    #[test]
    fn lead_prefers_poker_hand_over_smaller_shapes() {
        let hand = [
            c(Rank::Three, Suit::Clubs),
            c(Rank::Four, Suit::Diamonds),
            c(Rank::Five, Suit::Hearts),
            c(Rank::Six, Suit::Spades),
            c(Rank::Seven, Suit::Clubs),
            c(Rank::King, Suit::Hearts),
            c(Rank::King, Suit::Spades),
        ];
        let play = choose(&hand, &Combination::pass(), None);
        assert_eq!(
            play.kind(),
            CombinationKind::PokerHand(PokerHandKind::Straight)
        );
    }

    #[test]
    fn lead_falls_back_to_cheapest_double() {
        let hand = [
            c(Rank::Nine, Suit::Clubs),
            c(Rank::Nine, Suit::Hearts),
            c(Rank::Five, Suit::Diamonds),
            c(Rank::Five, Suit::Spades),
            c(Rank::Two, Suit::Clubs),
        ];
        let play = choose(&hand, &Combination::pass(), None);
        assert_eq!(
            play.cards(),
            &[c(Rank::Five, Suit::Diamonds), c(Rank::Five, Suit::Spades)]
        );
    }

    #[test]
    fn forced_card_steers_the_lead() {
        let hand = [
            Card::THREE_OF_DIAMONDS,
            c(Rank::Eight, Suit::Clubs),
            c(Rank::Eight, Suit::Hearts),
            c(Rank::Jack, Suit::Spades),
        ];
        let play = choose(&hand, &Combination::pass(), Some(Card::THREE_OF_DIAMONDS));
        assert_eq!(play, Combination::single(Card::THREE_OF_DIAMONDS));

        let pair = [
            Card::THREE_OF_DIAMONDS,
            c(Rank::Three, Suit::Hearts),
            c(Rank::Jack, Suit::Spades),
        ];
        let play = choose(&pair, &Combination::pass(), Some(Card::THREE_OF_DIAMONDS));
        assert_eq!(play.kind(), CombinationKind::Double);
        assert!(play.contains(Card::THREE_OF_DIAMONDS));
    }

    #[test]
    fn follow_takes_first_stronger_of_same_size() {
        let hand = [
            c(Rank::Four, Suit::Diamonds),
            c(Rank::Ten, Suit::Spades),
            c(Rank::King, Suit::Hearts),
        ];
        let previous = Combination::single(c(Rank::Nine, Suit::Clubs));
        assert_eq!(
            choose(&hand, &previous, None),
            Combination::single(c(Rank::Ten, Suit::Spades))
        );
    }

    #[test]
    fn follow_with_doubles() {
        let hand = [
            c(Rank::Four, Suit::Diamonds),
            c(Rank::Four, Suit::Clubs),
            c(Rank::Eight, Suit::Hearts),
            c(Rank::Eight, Suit::Spades),
        ];
        let previous = Combination::classify(&[
            c(Rank::Five, Suit::Clubs),
            c(Rank::Five, Suit::Spades),
        ])
        .unwrap();
        let play = choose(&hand, &previous, None);
        assert_eq!(play.cards()[0].rank, Rank::Eight);
    }

    #[test]
    fn follow_passes_when_outclassed() {
        let hand = [c(Rank::Ace, Suit::Spades), c(Rank::King, Suit::Spades)];
        let previous = Combination::single(c(Rank::Two, Suit::Diamonds));
        assert!(choose(&hand, &previous, None).is_pass());
    }

    #[test]
    fn empty_hand_passes() {
        assert!(choose(&[], &Combination::pass(), None).is_pass());
    }
}
