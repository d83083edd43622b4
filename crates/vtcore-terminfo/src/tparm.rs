//! Stack-based VM for terminfo parameterized-string capabilities.
//!
//! Capability strings like `cup`'s `\x1b[%i%p1%d;%p2%dH` encode cursor
//! arithmetic in a tiny `%`-escaped bytecode. [`compile`] turns that source
//! into a [`CompiledCapability`]; [`execute`] runs it against a parameter
//! list. [`TparmCache`] memoizes compilation the way a long-lived terminal
//! session would, so repeatedly invoking the same capability string does
//! not re-parse it.

use std::collections::HashMap;

/// Which of the two terminfo variable namespaces an instruction touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    /// Lowercase `a..z` variables.
    Static,
    /// Uppercase `A..Z` variables.
    Dynamic,
}

/// A single compiled bytecode instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instr {
    Literal(String),
    /// 1-based parameter index (`%p1`..`%p9`).
    PushParam(usize),
    PushInt(i32),
    PushChar(char),
    OutputDecimal,
    OutputOctal,
    OutputHex,
    OutputHexUpper,
    OutputChar,
    OutputString,
    /// `%i`: bump params 1 and 2 by one (1-based row/col capabilities).
    Increment,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    BitNot,
    LogicalAnd,
    LogicalOr,
    LogicalNot,
    Equals,
    Less,
    Greater,
    StrLen,
    SetVar(VarKind, char),
    GetVar(VarKind, char),
    CondStart,
    CondThen,
    CondElse,
    CondEnd,
}

/// A parsed capability string, ready to run through [`execute`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompiledCapability {
    instrs: Vec<Instr>,
}

/// Parse a capability source string into instructions.
///
/// Literal bytes between `%` tokens collapse into a single [`Instr::Literal`].
/// Unrecognized `%x` tokens are skipped rather than rejected, matching the
/// source format's tolerance for terminal-specific extensions.
#[must_use]
pub fn compile(source: &str) -> CompiledCapability {
    let chars: Vec<char> = source.chars().collect();
    let mut instrs = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c != '%' {
            literal.push(c);
            i += 1;
            continue;
        }
        i += 1;
        let Some(&tok) = chars.get(i) else { break };
        match tok {
            '%' => {
                literal.push('%');
                i += 1;
            }
            'p' => {
                flush(&mut literal, &mut instrs);
                i += 1;
                if let Some(d) = chars.get(i).and_then(|c| c.to_digit(10)) {
                    instrs.push(Instr::PushParam(d as usize));
                    i += 1;
                }
            }
            '\'' => {
                flush(&mut literal, &mut instrs);
                i += 1;
                let (ch, consumed) = parse_char_const(&chars[i..]);
                instrs.push(Instr::PushChar(ch));
                i += consumed;
                if chars.get(i) == Some(&'\'') {
                    i += 1;
                }
            }
            '{' => {
                flush(&mut literal, &mut instrs);
                i += 1;
                let start = i;
                while chars.get(i).is_some_and(|&c| c != '}') {
                    i += 1;
                }
                let value: i32 = chars[start..i].iter().collect::<String>().parse().unwrap_or(0);
                instrs.push(Instr::PushInt(value));
                if chars.get(i) == Some(&'}') {
                    i += 1;
                }
            }
            'l' => push(&mut literal, &mut instrs, Instr::StrLen, &mut i),
            '+' => push(&mut literal, &mut instrs, Instr::Add, &mut i),
            '-' => push(&mut literal, &mut instrs, Instr::Sub, &mut i),
            '*' => push(&mut literal, &mut instrs, Instr::Mul, &mut i),
            '/' => push(&mut literal, &mut instrs, Instr::Div, &mut i),
            'm' => push(&mut literal, &mut instrs, Instr::Mod, &mut i),
            '&' => push(&mut literal, &mut instrs, Instr::BitAnd, &mut i),
            '|' => push(&mut literal, &mut instrs, Instr::BitOr, &mut i),
            '^' => push(&mut literal, &mut instrs, Instr::BitXor, &mut i),
            '~' => push(&mut literal, &mut instrs, Instr::BitNot, &mut i),
            '!' => push(&mut literal, &mut instrs, Instr::LogicalNot, &mut i),
            'A' => push(&mut literal, &mut instrs, Instr::LogicalAnd, &mut i),
            'O' => push(&mut literal, &mut instrs, Instr::LogicalOr, &mut i),
            '=' => push(&mut literal, &mut instrs, Instr::Equals, &mut i),
            '<' => push(&mut literal, &mut instrs, Instr::Less, &mut i),
            '>' => push(&mut literal, &mut instrs, Instr::Greater, &mut i),
            'i' => push(&mut literal, &mut instrs, Instr::Increment, &mut i),
            '?' => push(&mut literal, &mut instrs, Instr::CondStart, &mut i),
            't' => push(&mut literal, &mut instrs, Instr::CondThen, &mut i),
            'e' => push(&mut literal, &mut instrs, Instr::CondElse, &mut i),
            ';' => push(&mut literal, &mut instrs, Instr::CondEnd, &mut i),
            'P' => {
                flush(&mut literal, &mut instrs);
                i += 1;
                if let Some(&name) = chars.get(i) {
                    instrs.push(Instr::SetVar(var_kind(name), name));
                    i += 1;
                }
            }
            'g' => {
                flush(&mut literal, &mut instrs);
                i += 1;
                if let Some(&name) = chars.get(i) {
                    instrs.push(Instr::GetVar(var_kind(name), name));
                    i += 1;
                }
            }
            'd' | 'o' | 'x' | 'X' | 'c' | 's' => {
                flush(&mut literal, &mut instrs);
                instrs.push(output_instr(tok));
                i += 1;
            }
            // printf-style width/precision/flags: consumed but not honored.
            '0'..='9' | ':' | '#' | '-' | ' ' | '.' => {
                flush(&mut literal, &mut instrs);
                while chars
                    .get(i)
                    .is_some_and(|c| matches!(c, '0'..='9' | ':' | '#' | '-' | ' ' | '.'))
                {
                    i += 1;
                }
                if let Some(&conv) = chars.get(i) {
                    if matches!(conv, 'd' | 'o' | 'x' | 'X' | 'c' | 's') {
                        instrs.push(output_instr(conv));
                    }
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    flush(&mut literal, &mut instrs);
    CompiledCapability { instrs }
}

fn flush(literal: &mut String, instrs: &mut Vec<Instr>) {
    if !literal.is_empty() {
        instrs.push(Instr::Literal(std::mem::take(literal)));
    }
}

fn push(literal: &mut String, instrs: &mut Vec<Instr>, instr: Instr, i: &mut usize) {
    flush(literal, instrs);
    instrs.push(instr);
    *i += 1;
}

fn var_kind(name: char) -> VarKind {
    if name.is_ascii_uppercase() {
        VarKind::Dynamic
    } else {
        VarKind::Static
    }
}

fn output_instr(c: char) -> Instr {
    match c {
        'o' => Instr::OutputOctal,
        'x' => Instr::OutputHex,
        'X' => Instr::OutputHexUpper,
        'c' => Instr::OutputChar,
        's' => Instr::OutputString,
        _ => Instr::OutputDecimal,
    }
}

fn parse_char_const(rest: &[char]) -> (char, usize) {
    match rest {
        ['\\', esc, ..] => {
            let c = match esc {
                'n' => '\n',
                'r' => '\r',
                't' => '\t',
                'b' => '\u{8}',
                'f' => '\u{c}',
                other => *other,
            };
            (c, 2)
        }
        [c, ..] => (*c, 1),
        [] => ('\0', 0),
    }
}

/// Run a compiled capability against `params`, returning the rendered
/// bytes as a `String`. Static and dynamic variables are scoped to this
/// call; they do not persist across invocations.
#[must_use]
pub fn execute(compiled: &CompiledCapability, params: &[i32]) -> String {
    let mut vm_params = [0i32; 9];
    for (slot, value) in vm_params.iter_mut().zip(params.iter()) {
        *slot = *value;
    }
    let mut stack: Vec<i32> = Vec::new();
    let mut statics = [0i32; 26];
    let mut dynamics = [0i32; 26];
    let mut out = String::new();
    let instrs = &compiled.instrs;
    let mut pc = 0;

    while pc < instrs.len() {
        match &instrs[pc] {
            Instr::Literal(s) => out.push_str(s),
            Instr::PushParam(n) => {
                let idx = n.saturating_sub(1).min(8);
                stack.push(vm_params[idx]);
            }
            Instr::PushInt(v) => stack.push(*v),
            Instr::PushChar(c) => stack.push(*c as i32),
            Instr::OutputDecimal | Instr::OutputString => out.push_str(&pop(&mut stack).to_string()),
            Instr::OutputOctal => out.push_str(&format!("{:o}", pop(&mut stack))),
            Instr::OutputHex => out.push_str(&format!("{:x}", pop(&mut stack))),
            Instr::OutputHexUpper => out.push_str(&format!("{:X}", pop(&mut stack))),
            Instr::OutputChar => {
                if let Some(c) = char::from_u32(pop(&mut stack) as u32) {
                    out.push(c);
                }
            }
            Instr::Increment => {
                vm_params[0] = vm_params[0].wrapping_add(1);
                vm_params[1] = vm_params[1].wrapping_add(1);
            }
            Instr::Add => binop(&mut stack, i32::wrapping_add),
            Instr::Sub => binop(&mut stack, i32::wrapping_sub),
            Instr::Mul => binop(&mut stack, i32::wrapping_mul),
            Instr::Div => {
                let b = pop(&mut stack);
                let a = pop(&mut stack);
                stack.push(if b == 0 { 0 } else { a.wrapping_div(b) });
            }
            Instr::Mod => {
                let b = pop(&mut stack);
                let a = pop(&mut stack);
                stack.push(if b == 0 { 0 } else { a.wrapping_rem(b) });
            }
            Instr::BitAnd => binop(&mut stack, |a, b| a & b),
            Instr::BitOr => binop(&mut stack, |a, b| a | b),
            Instr::BitXor => binop(&mut stack, |a, b| a ^ b),
            Instr::BitNot => {
                let a = pop(&mut stack);
                stack.push(!a);
            }
            Instr::LogicalAnd => binop_bool(&mut stack, |a, b| a != 0 && b != 0),
            Instr::LogicalOr => binop_bool(&mut stack, |a, b| a != 0 || b != 0),
            Instr::LogicalNot => {
                let a = pop(&mut stack);
                stack.push((a == 0) as i32);
            }
            Instr::Equals => binop_bool(&mut stack, |a, b| a == b),
            Instr::Less => binop_bool(&mut stack, |a, b| a < b),
            Instr::Greater => binop_bool(&mut stack, |a, b| a > b),
            Instr::StrLen => {
                let v = pop(&mut stack);
                stack.push(v.to_string().len() as i32);
            }
            Instr::SetVar(kind, name) => {
                let v = pop(&mut stack);
                let idx = var_index(*name);
                match kind {
                    VarKind::Static => statics[idx] = v,
                    VarKind::Dynamic => dynamics[idx] = v,
                }
            }
            Instr::GetVar(kind, name) => {
                let idx = var_index(*name);
                let v = match kind {
                    VarKind::Static => statics[idx],
                    VarKind::Dynamic => dynamics[idx],
                };
                stack.push(v);
            }
            Instr::CondStart | Instr::CondEnd => {}
            Instr::CondThen => {
                if pop(&mut stack) == 0 {
                    pc = skip_cond_branch(instrs, pc + 1, true);
                }
            }
            Instr::CondElse => {
                pc = skip_cond_branch(instrs, pc + 1, false);
            }
        }
        pc += 1;
    }
    out
}

/// Scan forward from `start`, skipping over any nested `%? ... %;` blocks,
/// until a marker at the current nesting depth is reached: `%e` when
/// `stop_on_else` is set, otherwise the matching `%;`.
fn skip_cond_branch(instrs: &[Instr], start: usize, stop_on_else: bool) -> usize {
    let mut depth = 0usize;
    let mut pc = start;
    while pc < instrs.len() {
        match instrs[pc] {
            Instr::CondStart => depth += 1,
            Instr::CondElse if depth == 0 && stop_on_else => return pc,
            Instr::CondEnd => {
                if depth == 0 {
                    return pc;
                }
                depth -= 1;
            }
            _ => {}
        }
        pc += 1;
    }
    pc
}

fn pop(stack: &mut Vec<i32>) -> i32 {
    stack.pop().unwrap_or(0)
}

fn binop(stack: &mut Vec<i32>, f: impl Fn(i32, i32) -> i32) {
    let b = pop(stack);
    let a = pop(stack);
    stack.push(f(a, b));
}

fn binop_bool(stack: &mut Vec<i32>, f: impl Fn(i32, i32) -> bool) {
    let b = pop(stack);
    let a = pop(stack);
    stack.push(f(a, b) as i32);
}

fn var_index(name: char) -> usize {
    let lower = name.to_ascii_lowercase();
    if lower.is_ascii_lowercase() {
        (lower as u8 - b'a') as usize
    } else {
        0
    }
}

/// Compile and run a capability string in one step, without caching.
/// Callers invoking the same capability string repeatedly should use
/// [`TparmCache`] instead.
#[must_use]
pub fn tparm(source: &str, params: &[i32]) -> String {
    execute(&compile(source), params)
}

/// Memoizes [`compile`] results by source string, the way a long-lived
/// terminal session avoids re-parsing the same capability on every draw.
#[derive(Debug, Default)]
pub struct TparmCache {
    compiled: HashMap<String, CompiledCapability>,
}

impl TparmCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the compiled form of `source`, compiling and caching it on
    /// first use.
    pub fn compile(&mut self, source: &str) -> CompiledCapability {
        if let Some(cached) = self.compiled.get(source) {
            return cached.clone();
        }
        let compiled = compile(source);
        self.compiled.insert(source.to_string(), compiled.clone());
        compiled
    }

    /// Compile (if needed) and execute `source` against `params`.
    pub fn tparm(&mut self, source: &str, params: &[i32]) -> String {
        let compiled = self.compile(source);
        execute(&compiled, params)
    }

    /// Drop every memoized compilation.
    pub fn clear_cache(&mut self) {
        self.compiled.clear();
    }
}
