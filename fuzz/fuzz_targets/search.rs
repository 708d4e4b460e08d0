#![no_main]
use libfuzzer_sys::fuzz_target;
use playout::game::Game;
use playout::games::nim::Nim;
use playout::mcts::{self, Config};

fuzz_target!(|data: (u8, u8, u8, u64)| {
    let (heap, max_take, iterations, seed) = data;
    if heap == 0 || max_take == 0 || iterations == 0 {
        return;
    }
    let game = Nim::new(u32::from(max_take));
    let state = Nim::start(u32::from(heap));
    let config = Config::default().with_iterations(u32::from(iterations));
    let action = mcts::think_seeded(&game, &state, &config, seed)
        .expect("search should succeed for a position with legal moves");
    assert!(game.legal_actions(&state).contains(&action));
});
