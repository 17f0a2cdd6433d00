//! Example diary entries offered by the "pick example" intent.

use rand::seq::SliceRandom;
use rand::Rng;

pub const EXAMPLE_ENTRIES: &[&str] = &[
    "Today I went to visit the aquarium with a friend. Afterwards we went to get milk \
     tea. At night we went to see a new action movie together.",
    "I woke up early and went jogging in the park. My legs hurt, but the sunrise over \
     the river was beautiful.",
    "It rained all day, so I stayed home, cooked curry for the first time, and called \
     my grandmother.",
    "I took the train to a small town by the sea, ate grilled fish at a tiny shop, \
     and got lost looking for the station.",
    "My coworker had a birthday today. We surprised her with a cake in the break room \
     and sang badly.",
    "I finally finished the book I have been reading for a month, then spent the \
     evening at a bookstore picking the next one.",
    "We went to a summer festival, tried to catch goldfish, failed every time, and \
     watched the fireworks from the bridge.",
];

/// Picks one entry from `EXAMPLE_ENTRIES`.
pub fn random_entry<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    EXAMPLE_ENTRIES
        .choose(rng)
        .copied()
        .unwrap_or(EXAMPLE_ENTRIES[0])
}

/// Picks one entry using the thread-local generator.
pub fn pick() -> &'static str {
    random_entry(&mut rand::thread_rng())
}
