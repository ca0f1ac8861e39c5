//! Source emitters for a [`DecoderTable`].
//!
//! [`render_rust`] produces the `exec` function the `mos-6502` crate
//! `include!`s. The output only names items that crate defines: the
//! `M6502`, `BusCycle`, `Registers` and `Status` types, the pin constants
//! `SYNC`, `IRQ`, `NMI`, `JAM` and the flag constants. Output is a pure
//! function of the table and the config.

use log::debug;

use crate::config::{GeneratorConfig, InvalidOpcodePolicy};
use crate::error::DecoderError;
use crate::flags;
use crate::fragment::{DecoderTable, Fragment};
use crate::ops::{Addr, AluOp, BusOp, Cond, Data, Effect, Latch, Reg, RmwOp};

/// Indenting line writer.
#[derive(Default)]
struct SourceWriter {
    out: String,
    depth: usize,
}

impl SourceWriter {
    fn line(&mut self, text: &str) {
        if text.is_empty() {
            self.out.push('\n');
            return;
        }
        for _ in 0..self.depth {
            self.out.push_str("    ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn open(&mut self, text: &str) {
        self.line(text);
        self.depth += 1;
    }

    fn close(&mut self, text: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }
}

/// Render the decoder as Rust source.
#[must_use]
pub fn render_rust(table: &DecoderTable, config: &GeneratorConfig) -> String {
    let mut w = SourceWriter::default();

    w.line("// Machine generated by m6502-decoder. Do not edit.");
    w.line(&format!("// Invalid opcode policy: {}.", config.invalid_policy));
    w.line("");
    w.line("/// Run instructions until at least `num_ticks` ticks have elapsed, or until");
    w.line("/// a pin in `cpu.break_mask` is asserted at an instruction boundary.");
    w.line("/// Returns the number of ticks executed.");
    w.line("#[allow(clippy::all, clippy::pedantic, unused_assignments, unused_mut)]");
    w.open("pub(crate) fn exec<T: FnMut(u64) -> u64>(cpu: &mut M6502<T>, num_ticks: u32) -> u32 {");
    w.line("let mut c = cpu.regs;");
    w.line("let break_mask = cpu.break_mask;");
    w.line("let mut bus = BusCycle::new(cpu.pins, &mut cpu.tick);");
    w.line("let mut ea: u16 = 0;");
    w.line("let mut t: u16 = 0;");
    w.open("loop {");

    w.line("// fetch");
    w.line("bus.set_addr(c.pc);");
    w.line("c.pc = c.pc.wrapping_add(1);");
    w.line("bus.on(SYNC);");
    w.line("bus.read();");
    w.line("bus.off(SYNC);");

    w.open("match bus.data() {");
    for fragment in table.fragments() {
        w.open(&format!("{:#04X} => {{", fragment.opcode.0));
        if config.comments {
            w.line(&format!("// {}", fragment.comment()));
        }
        if fragment.invalid {
            render_invalid(&mut w, fragment, config.invalid_policy);
        } else {
            render_ops(&mut w, &fragment.ops);
        }
        w.close("}");
    }
    w.close("}");

    let pending = "(bus.pins & NMI) != 0 || ((bus.pins & IRQ) != 0 && !c.p.is_set(I))";
    match config.invalid_policy {
        // a jammed CPU ignores interrupts
        InvalidOpcodePolicy::Jam => {
            w.open(&format!("if (bus.pins & JAM) == 0 && ({pending}) {{"));
        }
        InvalidOpcodePolicy::Nop => w.open(&format!("if {pending} {{")),
    }
    if config.comments {
        w.line("// interrupt acknowledge");
    }
    render_ops(&mut w, table.interrupt());
    w.close("}");

    w.open("if bus.ticks >= num_ticks || (bus.pins & break_mask) != 0 {");
    w.line("break;");
    w.close("}");
    w.close("}");

    w.line("cpu.regs = c;");
    w.line("let (pins, ticks) = bus.finish();");
    w.line("cpu.pins = pins;");
    w.line("ticks");
    w.close("}");

    debug!("emitted {} bytes of decoder source", w.out.len());
    w.out
}

/// Render the decoder table as pretty-printed JSON.
pub fn render_json(table: &DecoderTable) -> Result<String, DecoderError> {
    let mut json = serde_json::to_string_pretty(table)?;
    json.push('\n');
    Ok(json)
}

fn render_invalid(w: &mut SourceWriter, fragment: &Fragment, policy: InvalidOpcodePolicy) {
    match policy {
        InvalidOpcodePolicy::Jam => {
            w.line("c.pc = c.pc.wrapping_sub(1);");
            w.line("bus.on(JAM);");
        }
        InvalidOpcodePolicy::Nop => render_ops(w, &fragment.nop_ops()),
    }
}

fn render_ops(w: &mut SourceWriter, ops: &[BusOp]) {
    for op in ops {
        render_op(w, op);
    }
}

fn render_op(w: &mut SourceWriter, op: &BusOp) {
    match op {
        BusOp::SetAddr(addr) => {
            w.line(&format!("bus.set_addr({});", addr_expr(*addr)));
            if *addr == Addr::PcInc {
                w.line("c.pc = c.pc.wrapping_add(1);");
            }
        }
        BusOp::SetAddrData(addr, data) => {
            w.line(&format!(
                "bus.set_addr_data({}, {});",
                addr_expr(*addr),
                data_expr(*data)
            ));
            if *addr == Addr::PcInc {
                w.line("c.pc = c.pc.wrapping_add(1);");
            }
        }
        BusOp::SetData(data) => w.line(&format!("bus.set_data({});", data_expr(*data))),
        BusOp::Read => w.line("bus.read();"),
        BusOp::Write => w.line("bus.write();"),
        BusOp::Latch(latch) => w.line(&latch_stmt(*latch)),
        BusOp::Effect(effect) => {
            for stmt in effect_stmts(*effect) {
                w.line(&stmt);
            }
        }
        BusOp::When(cond, ops) => {
            w.open(&format!("if {} {{", cond_expr(*cond)));
            render_ops(w, ops);
            w.close("}");
        }
    }
}

fn reg(reg: Reg) -> &'static str {
    match reg {
        Reg::A => "c.a",
        Reg::X => "c.x",
        Reg::Y => "c.y",
        Reg::S => "c.s",
    }
}

fn flag(mask: u8) -> String {
    flags::name(mask).map_or_else(|| format!("{mask:#04X}"), str::to_string)
}

fn addr_expr(addr: Addr) -> &'static str {
    match addr {
        Addr::Pc | Addr::PcInc => "c.pc",
        Addr::Ea => "ea",
        Addr::EaNextInPage => "(ea & 0xFF00) | (ea.wrapping_add(1) & 0x00FF)",
        Addr::Stack => "0x0100 | u16::from(c.s)",
        Addr::BranchFixup => "(c.pc & 0xFF00) | (ea & 0x00FF)",
    }
}

fn data_expr(data: Data) -> String {
    match data {
        Data::Reg(r) => reg(r).to_string(),
        Data::AandX => "c.a & c.x".to_string(),
        Data::StatusBrk => "c.p.brk_push()".to_string(),
        Data::StatusIrq => "c.p.irq_push()".to_string(),
        Data::PcHi => "(c.pc >> 8) as u8".to_string(),
        Data::PcLo => "c.pc as u8".to_string(),
    }
}

fn latch_stmt(latch: Latch) -> String {
    match latch {
        Latch::ZeroPage => "ea = u16::from(bus.data());".to_string(),
        Latch::ZeroPageIndexed(index) => {
            format!("ea = (ea + u16::from({})) & 0x00FF;", reg(index.into()))
        }
        Latch::ZeroPageNext => "ea = (ea + 1) & 0x00FF;".to_string(),
        Latch::Temp => "t = u16::from(bus.data());".to_string(),
        Latch::TempIndexed(index) => {
            format!("t = u16::from(bus.data()) + u16::from({});", reg(index.into()))
        }
        Latch::HighTemp => "ea = (u16::from(bus.data()) << 8) | (t & 0x00FF);".to_string(),
        Latch::PageCarry => "ea = (ea & 0xFF00).wrapping_add(t);".to_string(),
        Latch::Vector(vector) => format!("ea = {vector:#06X};"),
        Latch::InterruptVector => {
            "ea = if (bus.pins & NMI) != 0 { 0xFFFA } else { 0xFFFE };".to_string()
        }
        Latch::BranchTarget => "ea = c.pc.wrapping_add(bus.data() as i8 as u16);".to_string(),
    }
}

fn alu_method(op: AluOp) -> &'static str {
    match op {
        AluOp::Ora => "ora",
        AluOp::And => "and",
        AluOp::Eor => "eor",
        AluOp::Adc => "adc",
        AluOp::Sbc => "sbc",
    }
}

fn rmw_method(op: RmwOp) -> &'static str {
    match op {
        RmwOp::Asl => "asl",
        RmwOp::Rol => "rol",
        RmwOp::Lsr => "lsr",
        RmwOp::Ror => "ror",
        RmwOp::Inc => "inc",
        RmwOp::Dec => "dec",
    }
}

fn effect_stmts(effect: Effect) -> Vec<String> {
    match effect {
        Effect::Load(r) => vec![
            format!("{} = bus.data();", reg(r)),
            format!("c.p.update_nz({});", reg(r)),
        ],
        Effect::LoadAX => vec![
            "c.a = bus.data();".to_string(),
            "c.x = c.a;".to_string(),
            "c.p.update_nz(c.a);".to_string(),
        ],
        Effect::Alu(op) => vec![format!("c.{}(bus.data());", alu_method(op))],
        Effect::Compare(r) => vec![format!("c.compare({}, bus.data());", reg(r))],
        Effect::Bit => vec!["c.bit(bus.data());".to_string()],
        Effect::Modify(op) => vec![
            format!("let v = c.{}(bus.data());", rmw_method(op)),
            "bus.set_data(v);".to_string(),
        ],
        Effect::ShiftAccumulator(op) => vec![format!("c.a = c.{}(c.a);", rmw_method(op))],
        Effect::Transfer { from, to } => {
            let mut stmts = vec![format!("{} = {};", reg(to), reg(from))];
            if to != Reg::S {
                stmts.push(format!("c.p.update_nz({});", reg(to)));
            }
            stmts
        }
        Effect::Increment(r) => vec![
            format!("{0} = {0}.wrapping_add(1);", reg(r)),
            format!("c.p.update_nz({});", reg(r)),
        ],
        Effect::Decrement(r) => vec![
            format!("{0} = {0}.wrapping_sub(1);", reg(r)),
            format!("c.p.update_nz({});", reg(r)),
        ],
        Effect::Flag { mask, set: true } => vec![format!("c.p.set({});", flag(mask))],
        Effect::Flag { mask, set: false } => vec![format!("c.p.clear({});", flag(mask))],
        Effect::PullStatus => vec!["c.p = Status::from_byte(bus.data());".to_string()],
        Effect::IncPc => vec!["c.pc = c.pc.wrapping_add(1);".to_string()],
        Effect::IncSp => vec!["c.s = c.s.wrapping_add(1);".to_string()],
        Effect::DecSp => vec!["c.s = c.s.wrapping_sub(1);".to_string()],
        Effect::LoadPc => vec!["c.pc = (u16::from(bus.data()) << 8) | (t & 0x00FF);".to_string()],
        Effect::JumpEa => vec!["c.pc = ea;".to_string()],
        Effect::ClearInterrupts => vec!["bus.off(IRQ | NMI);".to_string()],
    }
}

fn cond_expr(cond: Cond) -> String {
    match cond {
        Cond::PageCrossed => "(t & 0xFF00) != 0".to_string(),
        Cond::Branch { mask, test: true } => {
            let f = flag(mask);
            format!("(c.p.0 & {f}) == {f}")
        }
        Cond::Branch { mask, test: false } => format!("(c.p.0 & {}) == 0", flag(mask)),
        Cond::BranchPageCrossed => "(ea & 0xFF00) != (c.pc & 0xFF00)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(config: &GeneratorConfig) -> String {
        let table = DecoderTable::build().expect("shipped grid builds");
        render_rust(&table, config)
    }

    fn arm(source: &str, opcode: u8) -> &str {
        let start = source
            .find(&format!("{opcode:#04X} => {{"))
            .expect("arm present");
        let end = source[start..].find("\n            }\n").expect("arm closed");
        &source[start..start + end]
    }

    #[test]
    fn one_arm_per_opcode() {
        let source = render(&GeneratorConfig::default());
        let arms = source
            .lines()
            .filter(|line| line.starts_with("            0x") && line.ends_with(" => {"))
            .count();
        assert_eq!(arms, 256);
    }

    #[test]
    fn lda_immediate_arm() {
        let source = render(&GeneratorConfig::default());
        let lda = arm(&source, 0xA9);
        assert!(lda.contains("// LDA #"));
        assert!(lda.contains("bus.set_addr(c.pc);\n                c.pc = c.pc.wrapping_add(1);"));
        assert!(lda.contains("c.a = bus.data();"));
        assert!(lda.contains("c.p.update_nz(c.a);"));
    }

    #[test]
    fn indexed_read_fixup_is_conditional() {
        let source = render(&GeneratorConfig::default());
        assert!(arm(&source, 0xBD).contains("if (t & 0xFF00) != 0 {"));
        assert!(!arm(&source, 0x9D).contains("if (t & 0xFF00) != 0 {"));
    }

    #[test]
    fn invalid_policy_changes_only_invalid_arms() {
        let jam = render(&GeneratorConfig::default());
        let nop = render(&GeneratorConfig::with_policy(InvalidOpcodePolicy::Nop));
        assert!(arm(&jam, 0x02).contains("bus.on(JAM);"));
        assert!(!nop.contains("bus.on(JAM);"));
        assert_eq!(arm(&jam, 0xEA), arm(&nop, 0xEA));
    }

    #[test]
    fn nop_arms_fetch_the_slot_operands() {
        let nop = render(&GeneratorConfig::with_policy(InvalidOpcodePolicy::Nop));
        let shy = arm(&nop, 0x9C);
        assert_eq!(shy.matches("c.pc = c.pc.wrapping_add(1);").count(), 2);
        assert_eq!(shy.matches("bus.read();").count(), 4);
        assert!(!shy.contains("bus.write();"));

        let kil = arm(&nop, 0x02);
        assert!(kil.contains("bus.set_addr(c.pc);\n                bus.read();"));
        assert!(!kil.contains("wrapping_add"));
    }

    #[test]
    fn jammed_cpu_skips_the_interrupt_check() {
        let jam = render(&GeneratorConfig::default());
        assert!(jam.contains("if (bus.pins & JAM) == 0 && ((bus.pins & NMI) != 0"));

        let nop = render(&GeneratorConfig::with_policy(InvalidOpcodePolicy::Nop));
        assert!(nop.contains("if (bus.pins & NMI) != 0"));
        assert!(!nop.contains("JAM"));
    }

    #[test]
    fn comments_can_be_disabled() {
        let config = GeneratorConfig {
            comments: false,
            ..GeneratorConfig::default()
        };
        let source = render(&config);
        assert!(!source.contains("// LDA"));
        assert!(source.starts_with("// Machine generated"));
    }

    #[test]
    fn branch_conditions() {
        assert_eq!(
            cond_expr(Cond::Branch { mask: flags::Z, test: true }),
            "(c.p.0 & Z) == Z"
        );
        assert_eq!(
            cond_expr(Cond::Branch { mask: flags::N, test: false }),
            "(c.p.0 & N) == 0"
        );
    }

    #[test]
    fn transfers_to_s_leave_flags_alone() {
        let txs = effect_stmts(Effect::Transfer { from: Reg::X, to: Reg::S });
        assert_eq!(txs, vec!["c.s = c.x;".to_string()]);
    }
}
