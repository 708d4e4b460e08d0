#![no_main]
use libfuzzer_sys::fuzz_target;
use playout::games::tictactoe::Board;
use pretty_assertions::assert_eq;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(board) = Board::try_from(input) {
            assert_eq!(Board::try_from(board.to_string().as_str()).unwrap(), board);
        }
    }
});
