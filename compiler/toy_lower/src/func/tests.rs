#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use toy_diagnostic::ErrorCode;
use toy_ir::{
    BinOp, Constant, FloatPredicate, Function, InstrKind, IntPredicate, LocalId, Terminator, Type,
    Value,
};
use toy_syntax::{
    BasicKind, BinaryOp, Block, CaseClause, ExprId, IfStmt, Span, Stmt, StringInterner,
    SwitchStmt, TypeExpr, UnaryOp, UnitBuilder,
};

use crate::test_helpers::{lower, lower_with};
use crate::{LowerConfig, Signedness};

fn basic(kind: BasicKind) -> TypeExpr {
    UnitBuilder::basic(kind)
}

fn int() -> TypeExpr {
    basic(BasicKind::Int)
}

fn labels(func: &Function) -> Vec<&str> {
    func.blocks
        .iter()
        .map(|b| b.label.as_deref().unwrap_or(""))
        .collect()
}

fn entry_kinds(func: &Function) -> Vec<&InstrKind> {
    func.blocks[0].instrs.iter().map(|i| &i.kind).collect()
}

fn param(index: u32, ty: Type) -> Value {
    Value::Param { index, ty }
}

fn local(id: u32, ty: Type) -> Value {
    Value::Local {
        id: LocalId::new(id),
        ty,
    }
}

fn if_stmt(cond: ExprId, then: Vec<Stmt>, otherwise: Option<Vec<Stmt>>) -> Stmt {
    Stmt::If(IfStmt {
        init: None,
        cond,
        then_branch: Block::new(then),
        else_branch: otherwise.map(|stmts| Box::new(Stmt::Block(Block::new(stmts)))),
        span: Span::DUMMY,
    })
}

fn switch(tag: Option<ExprId>, cases: Vec<CaseClause>) -> Stmt {
    Stmt::Switch(SwitchStmt {
        init: None,
        tag,
        cases,
        span: Span::DUMMY,
    })
}

fn case(values: Vec<ExprId>, body: Vec<Stmt>) -> CaseClause {
    CaseClause {
        values,
        body,
        span: Span::DUMMY,
    }
}

/// Declare `func h()` without a body.
fn declare_h(b: &mut UnitBuilder<'_>) {
    let h = b.func_decl("h", Vec::new(), Vec::new(), None);
    b.func(h);
}

fn call_h(b: &mut UnitBuilder<'_>) -> Stmt {
    let h = b.ident("h");
    Stmt::Expr(b.call(h, Vec::new()))
}

// ── Straight-line bodies ───────────────────────────────────────────

#[test]
fn add_lowers_to_one_block() {
    let interner = StringInterner::new();
    let mut b = UnitBuilder::new(&interner, "main");
    let x = b.ident("a");
    let y = b.ident("b");
    let sum = b.binary(BinaryOp::Add, x, y);
    let ret = b.ret(vec![sum]);
    let params = vec![b.field(&["a", "b"], int())];
    let results = vec![b.field(&[], int())];
    let add = b.func_decl("Add", params, results, Some(vec![ret]));
    b.func(add);
    let unit = b.finish();

    let lowered = lower(&unit, &interner);
    assert!(lowered.diagnostics.is_empty());
    let func = lowered.func("Add");
    assert_eq!(lowered.ty(&func.sig()), "i64 (i64, i64)");
    assert_eq!(labels(func), vec!["entry"]);
    assert_eq!(
        entry_kinds(func),
        vec![&InstrKind::Binary {
            op: BinOp::Add,
            lhs: param(0, Type::I64),
            rhs: param(1, Type::I64),
        }]
    );
    assert_eq!(
        func.blocks[0].term,
        Terminator::Ret(Some(local(0, Type::I64)))
    );
}

#[test]
fn calls_use_the_function_by_reference() {
    let interner = StringInterner::new();
    let mut b = UnitBuilder::new(&interner, "main");
    let one = b.int("1", int());
    let ret = b.ret(vec![one]);
    let results = vec![b.field(&[], int())];
    let f = b.func_decl("one", Vec::new(), results, Some(vec![ret]));
    b.func(f);

    let callee = b.ident("one");
    let call = b.call(callee, Vec::new());
    let ret = b.ret(vec![call]);
    let results = vec![b.field(&[], int())];
    let g = b.func_decl("two", Vec::new(), results, Some(vec![ret]));
    b.func(g);
    let unit = b.finish();

    let lowered = lower(&unit, &interner);
    assert!(lowered.diagnostics.is_empty());
    let InstrKind::Call { callee, args } = entry_kinds(lowered.func("two"))[0] else {
        panic!("expected a call");
    };
    assert!(matches!(callee, Value::Func { .. }));
    assert_eq!(lowered.ty(&callee.ty()), "i64 ()*");
    assert!(args.is_empty());
}

#[test]
fn globals_are_loaded_in_value_position_and_stored_by_assignment() {
    let interner = StringInterner::new();
    let mut b = UnitBuilder::new(&interner, "main");
    b.var_decl(&["g"], Some(int()), Vec::new());
    let target = b.ident("g");
    let current = b.ident("g");
    let one = b.int("1", int());
    let next = b.binary(BinaryOp::Add, current, one);
    let assign = b.assign(target, next);
    let inc = b.func_decl("inc", Vec::new(), Vec::new(), Some(vec![assign]));
    b.func(inc);
    let unit = b.finish();

    let lowered = lower(&unit, &interner);
    assert!(lowered.diagnostics.is_empty());
    assert_eq!(
        lowered.global("g").init,
        Some(Constant::ZeroInit(Type::I64))
    );

    let func = lowered.func("inc");
    let kinds = entry_kinds(func);
    assert_eq!(kinds.len(), 3);
    let InstrKind::Load { src } = kinds[0] else {
        panic!("expected a load, got {:?}", kinds[0]);
    };
    assert!(matches!(src, Value::Global { .. }));
    assert!(matches!(kinds[1], InstrKind::Binary { op: BinOp::Add, .. }));
    let InstrKind::Store { dst, value } = kinds[2] else {
        panic!("expected a store, got {:?}", kinds[2]);
    };
    assert_eq!(dst, src);
    assert_eq!(value, &local(1, Type::I64));
    assert_eq!(func.blocks[0].term, Terminator::Ret(None));
}

#[test]
fn method_receiver_is_parameter_zero() {
    let interner = StringInterner::new();
    let mut b = UnitBuilder::new(&interner, "main");
    b.type_decl("T", int());
    let t = b.ident("t");
    let ret = b.ret(vec![t]);
    let results = vec![b.field(&[], b.named("T"))];
    let mut get = b.func_decl("Get", Vec::new(), results, Some(vec![ret]));
    get.recv = vec![b.field(&["t"], b.named("T"))];
    b.func(get);
    let unit = b.finish();

    let lowered = lower(&unit, &interner);
    assert!(lowered.diagnostics.is_empty());
    let func = lowered.func("T.Get");
    let Terminator::Ret(Some(Value::Param { index, ty })) = &func.blocks[0].term else {
        panic!("expected a parameter return");
    };
    assert_eq!(*index, 0);
    assert_eq!(lowered.ty(ty), "%T");
}

#[test]
fn blank_and_unnamed_parameters_keep_their_positions() {
    let interner = StringInterner::new();
    let mut b = UnitBuilder::new(&interner, "main");
    let y = b.ident("y");
    let ret = b.ret(vec![y]);
    let params = vec![b.field(&["_"], int()), b.field(&[], int()), b.field(&["y"], int())];
    let results = vec![b.field(&[], int())];
    let f = b.func_decl("f", params, results, Some(vec![ret]));
    b.func(f);
    let unit = b.finish();

    let lowered = lower(&unit, &interner);
    assert_eq!(
        lowered.func("f").blocks[0].term,
        Terminator::Ret(Some(param(2, Type::I64)))
    );
}

#[test]
fn predeclared_constants_without_checker_types() {
    let interner = StringInterner::new();
    let mut b = UnitBuilder::new(&interner, "main");
    let truth = b.ident("true");
    let ret = b.ret(vec![truth]);
    let results = vec![b.field(&[], basic(BasicKind::Bool))];
    let f = b.func_decl("yes", Vec::new(), results, Some(vec![ret]));
    b.func(f);
    let unit = b.finish();

    let lowered = lower(&unit, &interner);
    assert_eq!(
        lowered.func("yes").blocks[0].term,
        Terminator::Ret(Some(Value::Const(Constant::bool(true))))
    );
}

#[test]
fn multiple_results_are_packed_in_order() {
    let interner = StringInterner::new();
    let mut b = UnitBuilder::new(&interner, "main");
    b.type_decl("A", int());
    b.type_decl("B", basic(BasicKind::Float64));
    let a = b.int("1", b.named("A"));
    let f = b.float("2.5", b.named("B"));
    let ret = b.ret(vec![a, f]);
    let results = vec![b.field(&[], b.named("A")), b.field(&[], b.named("B"))];
    let pair = b.func_decl("F", Vec::new(), results, Some(vec![ret]));
    b.func(pair);
    let unit = b.finish();

    let lowered = lower(&unit, &interner);
    assert!(lowered.diagnostics.is_empty());
    let func = lowered.func("F");
    assert_eq!(lowered.ty(&func.ret), "{%A, %B}");

    let kinds = entry_kinds(func);
    assert_eq!(kinds.len(), 2);
    let InstrKind::InsertValue { agg, index, .. } = kinds[0] else {
        panic!("expected insertvalue");
    };
    assert_eq!(agg, &Value::Const(Constant::Undef(func.ret.clone())));
    assert_eq!(*index, 0);
    assert!(matches!(kinds[1], InstrKind::InsertValue { index: 1, .. }));

    let Terminator::Ret(Some(value)) = &func.blocks[0].term else {
        panic!("expected a value return");
    };
    assert_eq!(value.ty(), func.ret);
}

#[test]
fn statements_after_a_return_are_skipped() {
    let interner = StringInterner::new();
    let mut b = UnitBuilder::new(&interner, "main");
    declare_h(&mut b);
    let one = b.int("1", int());
    let ret = b.ret(vec![one]);
    let dead = call_h(&mut b);
    let results = vec![b.field(&[], int())];
    let f = b.func_decl("f", Vec::new(), results, Some(vec![ret, dead]));
    b.func(f);
    let unit = b.finish();

    let lowered = lower(&unit, &interner);
    assert!(lowered.diagnostics.is_empty());
    let func = lowered.func("f");
    assert_eq!(labels(func), vec!["entry"]);
    assert!(func.blocks[0].instrs.is_empty());
}

#[test]
fn missing_return_in_a_function_with_results_is_unreachable() {
    let interner = StringInterner::new();
    let mut b = UnitBuilder::new(&interner, "main");
    let results = vec![b.field(&[], int())];
    let f = b.func_decl("f", Vec::new(), results, Some(Vec::new()));
    b.func(f);
    let unit = b.finish();

    let lowered = lower(&unit, &interner);
    assert_eq!(lowered.func("f").blocks[0].term, Terminator::Unreachable);
}

// ── Control flow ───────────────────────────────────────────────────

#[test]
fn if_else_blocks_are_laid_out_depth_first() {
    let interner = StringInterner::new();
    let mut b = UnitBuilder::new(&interner, "main");
    let c = b.ident("c");
    let one = b.int("1", int());
    let two = b.int("2", int());
    let ret_one = b.ret(vec![one]);
    let ret_two = b.ret(vec![two]);
    let body = vec![if_stmt(c, vec![ret_one], Some(vec![ret_two]))];
    let params = vec![b.field(&["c"], basic(BasicKind::Bool))];
    let results = vec![b.field(&[], int())];
    let f = b.func_decl("pick", params, results, Some(body));
    b.func(f);
    let unit = b.finish();

    let lowered = lower(&unit, &interner);
    assert!(lowered.diagnostics.is_empty());
    let func = lowered.func("pick");
    assert_eq!(labels(func), vec!["entry", "if.then", "if.else", "if.done"]);
    assert_eq!(
        func.blocks[0].term,
        Terminator::CondBr {
            cond: param(0, Type::I1),
            then_block: func.blocks[1].id,
            else_block: func.blocks[2].id,
        }
    );
    assert_eq!(func.blocks[3].term, Terminator::Unreachable);
}

#[test]
fn if_without_else_branches_to_follow() {
    let interner = StringInterner::new();
    let mut b = UnitBuilder::new(&interner, "main");
    declare_h(&mut b);
    let c = b.ident("c");
    let then = call_h(&mut b);
    let body = vec![if_stmt(c, vec![then], None)];
    let params = vec![b.field(&["c"], basic(BasicKind::Bool))];
    let f = b.func_decl("maybe", params, Vec::new(), Some(body));
    b.func(f);
    let unit = b.finish();

    let lowered = lower(&unit, &interner);
    let func = lowered.func("maybe");
    assert_eq!(labels(func), vec!["entry", "if.then", "if.done"]);
    let follow = func.blocks[2].id;
    assert_eq!(
        func.blocks[0].term,
        Terminator::CondBr {
            cond: param(0, Type::I1),
            then_block: func.blocks[1].id,
            else_block: follow,
        }
    );
    assert_eq!(func.blocks[1].term, Terminator::Br(follow));
    assert_eq!(func.blocks[2].term, Terminator::Ret(None));
}

#[test]
fn tagless_switch_with_default() {
    let interner = StringInterner::new();
    let mut b = UnitBuilder::new(&interner, "main");
    declare_h(&mut b);
    let a = b.ident("a");
    let first = call_h(&mut b);
    let second = call_h(&mut b);
    let body = vec![switch(
        None,
        vec![case(vec![a], vec![first]), case(Vec::new(), vec![second])],
    )];
    let params = vec![b.field(&["a"], basic(BasicKind::Bool))];
    let f = b.func_decl("s", params, Vec::new(), Some(body));
    b.func(f);
    let unit = b.finish();

    let lowered = lower(&unit, &interner);
    assert!(lowered.diagnostics.is_empty());
    let func = lowered.func("s");
    assert_eq!(
        labels(func),
        vec!["entry", "switch.next", "switch.case", "switch.default", "switch.done"]
    );
    let [entry, next, case_block, default_block, follow] = &func.blocks[..] else {
        panic!("expected five blocks");
    };
    assert_eq!(
        entry.term,
        Terminator::CondBr {
            cond: param(0, Type::I1),
            then_block: case_block.id,
            else_block: next.id,
        }
    );
    assert_eq!(next.term, Terminator::Br(default_block.id));
    assert_eq!(case_block.term, Terminator::Br(follow.id));
    assert_eq!(default_block.term, Terminator::Br(follow.id));
    assert_eq!(follow.term, Terminator::Ret(None));
}

#[test]
fn default_is_dispatched_last_wherever_it_appears() {
    let interner = StringInterner::new();
    let mut b = UnitBuilder::new(&interner, "main");
    declare_h(&mut b);
    let a = b.ident("a");
    let first = call_h(&mut b);
    let second = call_h(&mut b);
    let body = vec![switch(
        None,
        vec![case(Vec::new(), vec![first]), case(vec![a], vec![second])],
    )];
    let params = vec![b.field(&["a"], basic(BasicKind::Bool))];
    let f = b.func_decl("s", params, Vec::new(), Some(body));
    b.func(f);
    let unit = b.finish();

    let lowered = lower(&unit, &interner);
    let func = lowered.func("s");
    assert_eq!(
        labels(func),
        vec!["entry", "switch.next", "switch.default", "switch.case", "switch.done"]
    );
    assert_eq!(
        func.blocks[0].term,
        Terminator::CondBr {
            cond: param(0, Type::I1),
            then_block: func.blocks[3].id,
            else_block: func.blocks[1].id,
        }
    );
    assert_eq!(func.blocks[1].term, Terminator::Br(func.blocks[2].id));
}

#[test]
fn tag_switch_compares_each_value() {
    let interner = StringInterner::new();
    let mut b = UnitBuilder::new(&interner, "main");
    let tag = b.ident("x");
    let one = b.int("1", int());
    let two = b.int("2", int());
    let three = b.int("3", int());
    let ten = b.int("10", int());
    let twenty = b.int("20", int());
    let zero = b.int("0", int());
    let ret_ten = b.ret(vec![ten]);
    let ret_twenty = b.ret(vec![twenty]);
    let ret_zero = b.ret(vec![zero]);
    let body = vec![
        switch(
            Some(tag),
            vec![case(vec![one, two], vec![ret_ten]), case(vec![three], vec![ret_twenty])],
        ),
        ret_zero,
    ];
    let params = vec![b.field(&["x"], int())];
    let results = vec![b.field(&[], int())];
    let f = b.func_decl("t", params, results, Some(body));
    b.func(f);
    let unit = b.finish();

    let lowered = lower(&unit, &interner);
    assert!(lowered.diagnostics.is_empty());
    let func = lowered.func("t");
    assert_eq!(
        labels(func),
        vec![
            "entry",
            "switch.next",
            "switch.next",
            "switch.next",
            "switch.case",
            "switch.case",
            "switch.done",
        ]
    );
    let compares = func
        .blocks
        .iter()
        .flat_map(|block| &block.instrs)
        .filter(|i| matches!(i.kind, InstrKind::ICmp { pred: IntPredicate::Eq, .. }))
        .count();
    assert_eq!(compares, 3);

    let case_one = func.blocks[4].id;
    for compare in &func.blocks[..2] {
        let Terminator::CondBr { then_block, .. } = compare.term else {
            panic!("expected a comparison branch");
        };
        assert_eq!(then_block, case_one);
    }
    assert_eq!(func.blocks[3].term, Terminator::Br(func.blocks[6].id));
    assert_eq!(
        func.blocks[6].term,
        Terminator::Ret(Some(Value::Const(Constant::int(Type::I64, 0))))
    );
}

#[test]
fn every_block_has_exactly_one_terminator_and_a_layout_slot() {
    let interner = StringInterner::new();
    let mut b = UnitBuilder::new(&interner, "main");
    declare_h(&mut b);
    let a = b.ident("a");
    let c = b.ident("c");
    let inner_call = call_h(&mut b);
    let inner = if_stmt(c, vec![inner_call], None);
    let after = call_h(&mut b);
    let body = vec![
        switch(None, vec![case(vec![a], vec![inner]), case(Vec::new(), Vec::new())]),
        after,
    ];
    let params = vec![
        b.field(&["a"], basic(BasicKind::Bool)),
        b.field(&["c"], basic(BasicKind::Bool)),
    ];
    let f = b.func_decl("nested", params, Vec::new(), Some(body));
    b.func(f);
    let unit = b.finish();

    let lowered = lower(&unit, &interner);
    assert!(lowered.diagnostics.is_empty());
    let func = lowered.func("nested");
    assert!(toy_ir::verify::verify_function(func).is_empty());
    assert!(func
        .blocks
        .iter()
        .all(|block| block.term != Terminator::Unreachable));
}

// ── Operators ──────────────────────────────────────────────────────

/// Lower `func f(x, y T) R { return x op y }`.
fn lower_binary_fn(
    op: BinaryOp,
    operand: TypeExpr,
    result: TypeExpr,
    config: &LowerConfig,
) -> (Vec<InstrKind>, Vec<ErrorCode>) {
    let interner = StringInterner::new();
    let mut b = UnitBuilder::new(&interner, "main");
    let x = b.typed_ident("x", operand.clone());
    let y = b.typed_ident("y", operand.clone());
    let expr = b.binary(op, x, y);
    let ret = b.ret(vec![expr]);
    let params = vec![b.field(&["x", "y"], operand)];
    let results = vec![b.field(&[], result)];
    let f = b.func_decl("f", params, results, Some(vec![ret]));
    b.func(f);
    let unit = b.finish();

    let lowered = lower_with(&unit, &interner, config);
    let codes = lowered.codes();
    let kinds = lowered
        .module
        .funcs
        .first()
        .and_then(|f| f.blocks.first())
        .map(|block| block.instrs.iter().map(|i| i.kind.clone()).collect())
        .unwrap_or_default();
    (kinds, codes)
}

fn default_config() -> LowerConfig {
    LowerConfig::default().with_verify(true)
}

fn binop_of(kind: &InstrKind) -> Option<BinOp> {
    match kind {
        InstrKind::Binary { op, .. } => Some(*op),
        _ => None,
    }
}

#[test]
fn float_operands_select_float_instructions() {
    let f64_ty = basic(BasicKind::Float64);
    let (kinds, _) = lower_binary_fn(BinaryOp::Quo, f64_ty.clone(), f64_ty.clone(), &default_config());
    assert_eq!(binop_of(&kinds[0]), Some(BinOp::FDiv));

    let (kinds, _) = lower_binary_fn(BinaryOp::Lss, f64_ty, basic(BasicKind::Bool), &default_config());
    assert!(matches!(
        kinds[0],
        InstrKind::FCmp {
            pred: FloatPredicate::Olt,
            ..
        }
    ));
}

#[test]
fn bit_clear_flips_the_mask_then_ands() {
    let byte = basic(BasicKind::Uint8);
    let (kinds, codes) = lower_binary_fn(BinaryOp::AndNot, byte.clone(), byte, &default_config());
    assert!(codes.is_empty());
    assert_eq!(
        kinds,
        vec![
            InstrKind::Binary {
                op: BinOp::Xor,
                lhs: param(1, Type::I8),
                rhs: Value::Const(Constant::Int {
                    ty: Type::I8,
                    bits: 0xff
                }),
            },
            InstrKind::Binary {
                op: BinOp::And,
                lhs: param(0, Type::I8),
                rhs: local(0, Type::I8),
            },
        ]
    );
}

#[test]
fn bitwise_operators_reject_floats() {
    let f64_ty = basic(BasicKind::Float64);
    let (_, codes) = lower_binary_fn(BinaryOp::Xor, f64_ty.clone(), f64_ty, &default_config());
    assert_eq!(codes, vec![ErrorCode::E4005]);
}

#[test]
fn logical_operators_need_booleans() {
    let bool_ty = basic(BasicKind::Bool);
    let (kinds, codes) = lower_binary_fn(BinaryOp::LAnd, bool_ty.clone(), bool_ty, &default_config());
    assert!(codes.is_empty());
    assert_eq!(binop_of(&kinds[0]), Some(BinOp::And));

    let (_, codes) = lower_binary_fn(BinaryOp::LOr, int(), basic(BasicKind::Bool), &default_config());
    assert_eq!(codes, vec![ErrorCode::E4005]);
}

#[test]
fn signed_selection_is_the_default() {
    let uint = basic(BasicKind::Uint);
    let config = default_config();
    let (kinds, _) = lower_binary_fn(BinaryOp::Quo, uint.clone(), uint.clone(), &config);
    assert_eq!(binop_of(&kinds[0]), Some(BinOp::SDiv));
    let (kinds, _) = lower_binary_fn(BinaryOp::Shr, int(), int(), &config);
    assert_eq!(binop_of(&kinds[0]), Some(BinOp::LShr));
    let (kinds, _) = lower_binary_fn(BinaryOp::Lss, uint, basic(BasicKind::Bool), &config);
    assert!(matches!(
        kinds[0],
        InstrKind::ICmp {
            pred: IntPredicate::Slt,
            ..
        }
    ));
}

#[test]
fn source_signedness_selects_unsigned_forms() {
    let uint = basic(BasicKind::Uint);
    let config = default_config().with_signedness(Signedness::FromSourceType);
    let (kinds, _) = lower_binary_fn(BinaryOp::Quo, uint.clone(), uint.clone(), &config);
    assert_eq!(binop_of(&kinds[0]), Some(BinOp::UDiv));
    let (kinds, _) = lower_binary_fn(BinaryOp::Rem, uint.clone(), uint.clone(), &config);
    assert_eq!(binop_of(&kinds[0]), Some(BinOp::URem));
    let (kinds, _) = lower_binary_fn(BinaryOp::Shr, uint.clone(), uint.clone(), &config);
    assert_eq!(binop_of(&kinds[0]), Some(BinOp::LShr));
    let (kinds, _) = lower_binary_fn(BinaryOp::Shr, int(), int(), &config);
    assert_eq!(binop_of(&kinds[0]), Some(BinOp::AShr));
    let (kinds, _) = lower_binary_fn(BinaryOp::Geq, uint, basic(BasicKind::Bool), &config);
    assert!(matches!(
        kinds[0],
        InstrKind::ICmp {
            pred: IntPredicate::Uge,
            ..
        }
    ));
}

#[test]
fn source_signedness_follows_the_left_operand() {
    let uint = basic(BasicKind::Uint);
    let interner = StringInterner::new();
    let mut b = UnitBuilder::new(&interner, "main");
    // `(x / y) / y` where only the inner quotient has a recorded type.
    let x = b.ident("x");
    let y = b.ident("y");
    let inner = b.typed_binary(BinaryOp::Quo, x, y, uint.clone());
    let y_again = b.ident("y");
    let outer = b.binary(BinaryOp::Quo, inner, y_again);
    let ret = b.ret(vec![outer]);
    let params = vec![b.field(&["x", "y"], uint.clone())];
    let results = vec![b.field(&[], uint)];
    let f = b.func_decl("f", params, results, Some(vec![ret]));
    b.func(f);
    let unit = b.finish();

    let config = default_config().with_signedness(Signedness::FromSourceType);
    let lowered = lower_with(&unit, &interner, &config);
    assert!(lowered.diagnostics.is_empty());
    let ops: Vec<_> = lowered.module.funcs[0].blocks[0]
        .instrs
        .iter()
        .filter_map(|i| binop_of(&i.kind))
        .collect();
    assert_eq!(ops, vec![BinOp::SDiv, BinOp::UDiv]);
}

/// Lower `func f(x T) T { return op x }`.
fn lower_unary_fn(op: UnaryOp, ty: TypeExpr) -> (Vec<InstrKind>, Vec<ErrorCode>) {
    let interner = StringInterner::new();
    let mut b = UnitBuilder::new(&interner, "main");
    let x = b.ident("x");
    let expr = b.unary(op, x);
    let ret = b.ret(vec![expr]);
    let params = vec![b.field(&["x"], ty.clone())];
    let results = vec![b.field(&[], ty)];
    let f = b.func_decl("f", params, results, Some(vec![ret]));
    b.func(f);
    let unit = b.finish();

    let lowered = lower(&unit, &interner);
    let kinds = lowered.func("f").blocks.first().map_or_else(Vec::new, |block| {
        block.instrs.iter().map(|i| i.kind.clone()).collect()
    });
    (kinds, lowered.codes())
}

#[test]
fn unary_operators() {
    let (kinds, _) = lower_unary_fn(UnaryOp::Plus, int());
    assert!(kinds.is_empty());

    let (kinds, _) = lower_unary_fn(UnaryOp::Neg, int());
    assert_eq!(
        kinds,
        vec![InstrKind::Binary {
            op: BinOp::Sub,
            lhs: Value::Const(Constant::int(Type::I64, 0)),
            rhs: param(0, Type::I64),
        }]
    );

    let (kinds, _) = lower_unary_fn(UnaryOp::Neg, basic(BasicKind::Float64));
    assert_eq!(binop_of(&kinds[0]), Some(BinOp::FSub));

    let (kinds, _) = lower_unary_fn(UnaryOp::Not, basic(BasicKind::Bool));
    assert_eq!(
        kinds,
        vec![InstrKind::Binary {
            op: BinOp::Xor,
            lhs: param(0, Type::I1),
            rhs: Value::Const(Constant::bool(true)),
        }]
    );

    let (kinds, _) = lower_unary_fn(UnaryOp::Complement, basic(BasicKind::Int32));
    assert_eq!(
        kinds,
        vec![InstrKind::Binary {
            op: BinOp::Xor,
            lhs: param(0, Type::I32),
            rhs: Value::Const(Constant::Int {
                ty: Type::I32,
                bits: 0xffff_ffff
            }),
        }]
    );

    let (_, codes) = lower_unary_fn(UnaryOp::Not, int());
    assert_eq!(codes, vec![ErrorCode::E4005]);
}

// ── Failures ───────────────────────────────────────────────────────

#[test]
fn failed_function_keeps_only_its_declaration() {
    let interner = StringInterner::new();
    let mut b = UnitBuilder::new(&interner, "main");
    let missing = b.ident("missing");
    let ret = b.ret(vec![missing]);
    let results = vec![b.field(&[], int())];
    let bad = b.func_decl("bad", Vec::new(), results, Some(vec![ret]));
    b.func(bad);
    let good = b.func_decl("good", Vec::new(), Vec::new(), Some(Vec::new()));
    b.func(good);
    let unit = b.finish();

    let lowered = lower(&unit, &interner);
    assert_eq!(lowered.codes(), vec![ErrorCode::E4007]);
    assert_eq!(
        lowered.diagnostics[0].message,
        "cannot find `missing` in this unit"
    );
    assert!(lowered.func("bad").is_declaration());
    assert!(!lowered.func("good").is_declaration());
}

#[test]
fn statement_errors_are_all_reported() {
    let interner = StringInterner::new();
    let mut b = UnitBuilder::new(&interner, "main");
    let first = b.ident("first");
    let second = b.ident("second");
    let body = vec![Stmt::Expr(first), Stmt::Expr(second)];
    let f = b.func_decl("f", Vec::new(), Vec::new(), Some(body));
    b.func(f);
    let unit = b.finish();

    let lowered = lower(&unit, &interner);
    assert_eq!(lowered.codes(), vec![ErrorCode::E4007, ErrorCode::E4007]);
    assert!(lowered.func("f").is_declaration());
}

#[test]
fn condition_error_abandons_the_rest_of_the_body() {
    let interner = StringInterner::new();
    let mut b = UnitBuilder::new(&interner, "main");
    let cond = b.int("1", int());
    let later = b.ident("later");
    let body = vec![if_stmt(cond, Vec::new(), None), Stmt::Expr(later)];
    let f = b.func_decl("f", Vec::new(), Vec::new(), Some(body));
    b.func(f);
    let unit = b.finish();

    let lowered = lower(&unit, &interner);
    assert_eq!(lowered.codes(), vec![ErrorCode::E4005]);
    assert!(lowered.func("f").is_declaration());
}

#[test]
fn switch_case_of_another_type_is_a_mismatch() {
    let interner = StringInterner::new();
    let mut b = UnitBuilder::new(&interner, "main");
    let tag = b.ident("x");
    let value = b.float("1.5", basic(BasicKind::Float64));
    let body = vec![switch(Some(tag), vec![case(vec![value], Vec::new())])];
    let params = vec![b.field(&["x"], int())];
    let f = b.func_decl("f", params, Vec::new(), Some(body));
    b.func(f);
    let unit = b.finish();

    let lowered = lower(&unit, &interner);
    assert_eq!(lowered.codes(), vec![ErrorCode::E4006]);
    assert_eq!(
        lowered.diagnostics[0].message,
        "cannot compare `i64` with `double`"
    );
}

#[test]
fn call_shape_errors() {
    let interner = StringInterner::new();
    let mut b = UnitBuilder::new(&interner, "main");
    let params = vec![b.field(&["a"], int())];
    let g = b.func_decl("g", params, Vec::new(), None);
    b.func(g);

    let callee = b.ident("g");
    let too_few = b.call(callee, Vec::new());
    let callee = b.ident("g");
    let arg = b.int("1", int());
    let spread = b.spread_call(callee, vec![arg]);
    let callee = b.int("3", int());
    let not_a_function = b.call(callee, Vec::new());
    let body = vec![
        Stmt::Expr(too_few),
        Stmt::Expr(spread),
        Stmt::Expr(not_a_function),
    ];
    let f = b.func_decl("f", Vec::new(), Vec::new(), Some(body));
    b.func(f);
    let unit = b.finish();

    let lowered = lower(&unit, &interner);
    assert_eq!(
        lowered.codes(),
        vec![ErrorCode::E4009, ErrorCode::E4010, ErrorCode::E4005]
    );
}

#[test]
fn return_shape_errors() {
    let interner = StringInterner::new();
    let mut b = UnitBuilder::new(&interner, "main");
    let one = b.int("1", int());
    let with_value = b.ret(vec![one]);
    let f = b.func_decl("f", Vec::new(), Vec::new(), Some(vec![with_value]));
    b.func(f);
    let bare = b.ret(Vec::new());
    let results = vec![b.field(&[], int())];
    let g = b.func_decl("g", Vec::new(), results, Some(vec![bare]));
    b.func(g);
    let unit = b.finish();

    let lowered = lower(&unit, &interner);
    assert_eq!(lowered.codes(), vec![ErrorCode::E4011, ErrorCode::E4011]);
}

#[test]
fn assigning_to_a_parameter_is_rejected() {
    let interner = StringInterner::new();
    let mut b = UnitBuilder::new(&interner, "main");
    let target = b.ident("x");
    let one = b.int("1", int());
    let assign = b.assign(target, one);
    let params = vec![b.field(&["x"], int())];
    let f = b.func_decl("f", params, Vec::new(), Some(vec![assign]));
    b.func(f);
    let unit = b.finish();

    let lowered = lower(&unit, &interner);
    assert_eq!(lowered.codes(), vec![ErrorCode::E4012]);
}
