//! Sentence parsing properties.

use strata_arith::{parse_sentence, ArithError, ArithmeticOperator as Op, LayerArithmetic, Operation};

const LAST: u32 = 199;

fn targets(sentence: &str) -> Vec<u32> {
    let parsed = parse_sentence(sentence, LAST).unwrap();
    parsed.groups[0].targets().iter().copied().collect()
}

#[test]
fn test_implicit_target_is_first_operand() {
    for sentence in ["10+11", "7", "3*4/5", "42$0", "9|8&7^6"] {
        let parsed = parse_sentence(sentence, LAST).unwrap();
        for group in &parsed.groups {
            let first = group.operations()[0].layer;
            assert_eq!(
                group.targets().iter().copied().collect::<Vec<_>>(),
                vec![first],
                "sentence {:?}",
                sentence
            );
        }
    }
}

#[test]
fn test_documented_examples() {
    let parsed = parse_sentence("10+11", LAST).unwrap();
    assert_eq!(parsed.groups.len(), 1);
    assert_eq!(targets("10+11"), vec![10]);
    assert_eq!(
        parsed.groups[0].operations(),
        &[Operation::new(10, Op::Add), Operation::terminal(11)]
    );

    let parsed = parse_sentence("10,11,12=11+12-10*5", LAST).unwrap();
    assert_eq!(parsed.groups.len(), 1);
    assert_eq!(targets("10,11,12=11+12-10*5"), vec![10, 11, 12]);
    assert_eq!(
        parsed.groups[0].operations(),
        &[
            Operation::new(11, Op::Add),
            Operation::new(12, Op::Subtract),
            Operation::new(10, Op::Multiply),
            Operation::terminal(5),
        ]
    );
}

#[test]
fn test_range_equals_list() {
    assert_eq!(targets("10:12=11+12-10*5"), targets("10,11,12=11+12-10*5"));
    assert_eq!(targets("0:3,10:12=1"), vec![0, 1, 2, 3, 10, 11, 12]);
}

#[test]
fn test_open_range_runs_to_last_layer() {
    let t = targets("195:=1");
    assert_eq!(t, vec![195, 196, 197, 198, 199]);
}

#[test]
fn test_leading_operator_ignored() {
    let a = parse_sentence("+11", LAST).unwrap();
    let b = parse_sentence("11", LAST).unwrap();
    assert_eq!(a.groups, b.groups);
    assert_eq!(a.diagnostics.skipped_symbols, 1);
}

#[test]
fn test_self_assignment_rejected() {
    let mut op = LayerArithmetic::new("5=5");
    assert!(op.parse(LAST));
    assert!(!op.is_valid());

    let mut op = LayerArithmetic::new("5");
    assert!(op.parse(LAST));
    assert!(!op.is_valid());
}

#[test]
fn test_parse_idempotent() {
    let sentences = [
        "10+11",
        "10:12=11+12-10*5",
        " 1 ; 2 = 3 $ 4 ; :5 = 6 | 7 ",
        "+-5*+6",
        "300+1",
    ];
    for sentence in sentences {
        let mut op = LayerArithmetic::new(sentence);
        let first_ok = op.parse(LAST);
        let first = (op.groups().to_vec(), op.diagnostics());
        let second_ok = op.parse(LAST);
        assert_eq!(first_ok, second_ok, "sentence {:?}", sentence);
        assert_eq!(first, (op.groups().to_vec(), op.diagnostics()), "sentence {:?}", sentence);
    }
}

#[test]
fn test_syntax_errors() {
    assert!(matches!(parse_sentence("", LAST), Err(ArithError::EmptySentence)));
    assert!(matches!(
        parse_sentence("1+2; 3=", LAST),
        Err(ArithError::EmptyExpression { group: 1 })
    ));

    let mut op = LayerArithmetic::new("1+2; 3=");
    assert!(!op.parse(LAST));
    assert!(op.groups().is_empty());
}

#[test]
fn test_out_of_range_is_tolerated_and_counted() {
    let parsed = parse_sentence("1,500=2+600+3", LAST).unwrap();
    let group = &parsed.groups[0];
    assert_eq!(group.targets().iter().copied().collect::<Vec<_>>(), vec![1]);
    assert_eq!(
        group.operations(),
        &[Operation::new(2, Op::Add), Operation::terminal(3)]
    );
    assert_eq!(parsed.diagnostics.dropped_targets, 1);
    assert_eq!(parsed.diagnostics.dropped_operands, 1);
    assert_eq!(parsed.diagnostics.total(), 2);
}

#[test]
fn test_every_operator_symbol() {
    let parsed = parse_sentence("0=1+2-3*4/5&6|7^8$9", LAST).unwrap();
    let ops: Vec<Op> = parsed.groups[0].operations().iter().map(|o| o.operator).collect();
    assert_eq!(
        ops,
        vec![
            Op::Add,
            Op::Subtract,
            Op::Multiply,
            Op::Divide,
            Op::BitwiseAnd,
            Op::BitwiseOr,
            Op::BitwiseXor,
            Op::AbsDiff,
            Op::None,
        ]
    );
}
