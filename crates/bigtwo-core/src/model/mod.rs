pub mod card;
pub mod combination;
pub mod deck;
pub mod rank;
pub mod seat;
pub mod suit;
