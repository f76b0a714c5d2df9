//! End-to-end scenarios driven through the public `Board` API.

use ticket_board_core::{Board, BoardConfig, Entry, KeyInput, KeyOutcome};

fn board(config: BoardConfig) -> Board {
    Board::init(config, 100.0, 40.0).unwrap_or_else(|err| panic!("init failed: {err}"))
}

fn settle(board: &mut Board) {
    for _ in 0..20_000 {
        if !board.tick() {
            return;
        }
    }
    panic!("board never settled");
}

fn numbers(entries: impl IntoIterator<Item = Entry>) -> Vec<u32> {
    entries.into_iter().map(Entry::number).collect()
}

fn queue_numbers(board: &Board) -> Vec<u32> {
    numbers(board.queue().entries().iter().copied())
}

fn type_number(board: &mut Board, digits: &str) {
    for c in digits.chars() {
        let key = KeyInput::digit(c).unwrap_or_else(|| panic!("not a digit: {c}"));
        board.handle_key(key);
    }
}

#[test]
fn twenty_one_numbers_then_remove_fifth() {
    let mut board = board(BoardConfig::default());
    for n in 1..=21 {
        board.add(n);
    }
    settle(&mut board);
    assert_eq!(numbers(board.slot_entries()), (1..=20).collect::<Vec<_>>());
    assert_eq!(numbers(board.buffered()), vec![21]);

    assert!(board.remove(5));
    settle(&mut board);

    let slots = numbers(board.slot_entries());
    assert_eq!(slots.len(), 20);
    assert_eq!(slots[4], 21);
    assert!(board.buffered().is_empty());
    assert_eq!(board.queue().len(), 20);
}

#[test]
fn settled_counts_match_queue_through_churn() {
    let config = BoardConfig {
        columns: 3,
        rows: 2,
        ..BoardConfig::default()
    };
    let mut board = board(config);
    let mut seed: u32 = 0x2545_f491;
    for round in 0..200 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let number = (seed >> 16) % 12;
        if seed & 1 == 0 {
            board.add(number);
        } else {
            board.remove(number);
        }
        if round % 7 == 0 {
            settle(&mut board);
            let grid = board.grid();
            assert_eq!(board.queue().len(), grid.occupied() + grid.buffer().len());
            assert!(grid.occupied() <= grid.capacity());
        }
    }
    settle(&mut board);
    let mut shown = numbers(board.slot_entries());
    shown.extend(numbers(board.buffered()));
    shown.sort_unstable();
    let mut queued = queue_numbers(&board);
    queued.sort_unstable();
    assert_eq!(shown, queued);
}

#[test]
fn buffer_drains_in_arrival_order() {
    let config = BoardConfig {
        columns: 2,
        rows: 1,
        ..BoardConfig::default()
    };
    let mut board = board(config);
    for n in [10, 20, 30, 40, 50] {
        board.add(n);
    }
    settle(&mut board);
    assert_eq!(numbers(board.buffered()), vec![30, 40, 50]);

    board.remove(20);
    settle(&mut board);
    assert_eq!(numbers(board.slot_entries()), vec![10, 30]);
    board.remove(10);
    settle(&mut board);
    assert_eq!(numbers(board.slot_entries()), vec![40, 30]);
    assert_eq!(numbers(board.buffered()), vec![50]);
}

#[test]
fn typed_number_slides_into_lowest_free_slot() {
    let mut board = board(BoardConfig::default());
    board.add(1);
    board.add(2);
    settle(&mut board);

    type_number(&mut board, "07");
    assert_eq!(board.preview().map(|p| p.digits().to_owned()), Some("7".into()));
    assert_eq!(board.preview().map(|p| p.target_slot()), Some(2));
    board.handle_key(KeyInput::Enter);
    settle(&mut board);
    assert_eq!(queue_numbers(&board), vec![1, 2, 7]);
    assert_eq!(numbers(board.slot_entries()), vec![1, 2, 7]);
}

#[test]
fn third_digit_is_ignored_with_two_digit_limit() {
    let mut board = board(BoardConfig::default());
    type_number(&mut board, "12");
    assert_eq!(board.handle_key(KeyInput::Digit(3)), KeyOutcome::Ignored);
    assert_eq!(board.preview().map(|p| p.value()), Some(12));
}

#[test]
fn removing_a_missing_number_changes_nothing() {
    let mut board = board(BoardConfig::default());
    board.add(4);
    board.add(5);
    settle(&mut board);
    assert!(!board.remove(99));
    assert!(!board.is_animating());
    assert_eq!(queue_numbers(&board), vec![4, 5]);
    assert_eq!(numbers(board.slot_entries()), vec![4, 5]);
}

#[test]
fn duplicates_leave_in_queue_order() {
    let mut board = board(BoardConfig::default());
    for n in [3, 8, 3] {
        board.add(n);
    }
    settle(&mut board);
    board.remove(3);
    assert_eq!(queue_numbers(&board), vec![8, 3]);
    settle(&mut board);
    assert_eq!(numbers(board.slot_entries()), vec![8, 3]);
}

#[test]
fn auto_add_hands_out_sequential_numbers() {
    let mut board = board(BoardConfig {
        auto_add: true,
        ..BoardConfig::default()
    });
    board.handle_key(KeyInput::Enter);
    assert_eq!(board.handle_key(KeyInput::Enter), KeyOutcome::Ignored);
    settle(&mut board);
    board.handle_key(KeyInput::Enter);
    settle(&mut board);
    assert_eq!(queue_numbers(&board), vec![0, 1]);
    assert_eq!(numbers(board.slot_entries()), vec![0, 1]);
}

#[test]
fn auto_add_wraps_at_digit_boundary() {
    let mut board = board(BoardConfig {
        auto_add: true,
        auto_start: 99,
        ..BoardConfig::default()
    });
    for _ in 0..2 {
        board.advance();
        settle(&mut board);
    }
    assert_eq!(queue_numbers(&board), vec![99, 0]);
}

#[test]
fn config_parses_from_toml() {
    let config: BoardConfig = toml::from_str(
        r"
        columns = 4
        rows = 2
        auto_add = true

        [animation]
        fade_iterations = 10
        ",
    )
    .unwrap_or_else(|err| panic!("bad toml: {err}"));
    assert_eq!(config.capacity(), 8);
    let mut board = board(config);
    board.advance();
    settle(&mut board);
    assert_eq!(queue_numbers(&board), vec![0]);
}
