// src/cpu/decode.rs

//! Tabela de decodificação: 256 entradas, uma por opcode.
//!
//! Cada entrada carrega o mnemônico, o modo de endereçamento, os flags de
//! leitura/escrita, o tamanho em bytes, o custo em ciclos e um ponteiro de
//! função com o corpo da instrução. O contrato de cada corpo é avançar o PC
//! pelo tamanho declarado (via modo de endereçamento) e deixar os flags
//! conforme a regra da ALU do seu grupo.

use lazy_static::lazy_static;

use super::core::Hd6303;

/// Modo de endereçamento (as variantes de 16 bits e de imediato+endereço
/// ficam codificadas no corpo da instrução).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Immediate,
    Direct,
    Indexed,
    Extended,
    Implied,
    Illegal,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Immediate => "im",
            Mode::Direct => "di",
            Mode::Indexed => "in",
            Mode::Extended => "ex",
            Mode::Implied => "id",
            Mode::Illegal => "??",
        }
    }
}

/// Uma entrada da tabela de decodificação.
#[derive(Clone, Copy)]
pub struct Instruction {
    pub opcode: u8,
    pub group: &'static str,
    pub name: &'static str,
    pub mode: Mode,
    pub reads: bool,
    pub writes: bool,
    pub bytes: u8,
    pub cycles: u8,
    pub exec: fn(&mut Hd6303),
}

lazy_static! {
    /// Tabela de instruções, indexada pelo opcode.
    pub static ref INSTRUCTIONS: [Instruction; 256] = build();
}

#[allow(clippy::too_many_arguments)]
fn i(
    opcode: u8,
    group: &'static str,
    name: &'static str,
    mode: Mode,
    reads: bool,
    writes: bool,
    bytes: u8,
    cycles: u8,
    exec: fn(&mut Hd6303),
) -> Instruction {
    Instruction {
        opcode,
        group,
        name,
        mode,
        reads,
        writes,
        bytes,
        cycles,
        exec,
    }
}

#[rustfmt::skip]
fn build() -> [Instruction; 256] {
    use Mode::{Direct as DI, Extended as EX, Immediate as IM, Implied as ID, Indexed as IN};

    let illegal = Instruction {
        opcode: 0, group: "", name: "", mode: Mode::Illegal,
        reads: false, writes: false, bytes: 1, cycles: 0, exec: |_| {},
    };
    let mut t = [illegal; 256];

    //           OP    GRP    INST    AM  R      W      Byt Cyc  Corpo
    t[0x89] = i(0x89, "adc", "adca", IM, false, false, 2, 2, |c| { c.immed2(); let r = c.a.wrapping_add(c.op).wrapping_add(c.ccr.c as u8); c.ccr.add8(c.a, c.op, r); c.a = r; });
    t[0x99] = i(0x99, "adc", "adca", DI, true,  false, 2, 3, |c| { c.direct2(); let r = c.a.wrapping_add(c.op).wrapping_add(c.ccr.c as u8); c.ccr.add8(c.a, c.op, r); c.a = r; });
    t[0xa9] = i(0xa9, "adc", "adca", IN, true,  false, 2, 4, |c| { c.index2(); let r = c.a.wrapping_add(c.op).wrapping_add(c.ccr.c as u8); c.ccr.add8(c.a, c.op, r); c.a = r; });
    t[0xb9] = i(0xb9, "adc", "adca", EX, true,  false, 3, 4, |c| { c.extend(); let r = c.a.wrapping_add(c.op).wrapping_add(c.ccr.c as u8); c.ccr.add8(c.a, c.op, r); c.a = r; });
    t[0xc9] = i(0xc9, "adc", "adcb", IM, false, false, 2, 2, |c| { c.immed2(); let r = c.b.wrapping_add(c.op).wrapping_add(c.ccr.c as u8); c.ccr.add8(c.b, c.op, r); c.b = r; });
    t[0xd9] = i(0xd9, "adc", "adcb", DI, true,  false, 2, 3, |c| { c.direct2(); let r = c.b.wrapping_add(c.op).wrapping_add(c.ccr.c as u8); c.ccr.add8(c.b, c.op, r); c.b = r; });
    t[0xe9] = i(0xe9, "adc", "adcb", IN, true,  false, 2, 4, |c| { c.index2(); let r = c.b.wrapping_add(c.op).wrapping_add(c.ccr.c as u8); c.ccr.add8(c.b, c.op, r); c.b = r; });
    t[0xf9] = i(0xf9, "adc", "adcb", EX, true,  false, 3, 4, |c| { c.extend(); let r = c.b.wrapping_add(c.op).wrapping_add(c.ccr.c as u8); c.ccr.add8(c.b, c.op, r); c.b = r; });
    t[0x1b] = i(0x1b, "add", "aba ", ID, false, false, 1, 1, |c| { c.implied(); let r = c.a.wrapping_add(c.b); c.ccr.add8(c.a, c.b, r); c.a = r; });
    t[0x3a] = i(0x3a, "add", "abx ", ID, false, false, 1, 1, |c| { c.implied(); c.ix = c.ix.wrapping_add(c.b as u16); });
    t[0x8b] = i(0x8b, "add", "adda", IM, false, false, 2, 2, |c| { c.immed2(); let r = c.a.wrapping_add(c.op); c.ccr.add8(c.a, c.op, r); c.a = r; });
    t[0x9b] = i(0x9b, "add", "adda", DI, true,  false, 2, 3, |c| { c.direct2(); let r = c.a.wrapping_add(c.op); c.ccr.add8(c.a, c.op, r); c.a = r; });
    t[0xab] = i(0xab, "add", "adda", IN, true,  false, 2, 4, |c| { c.index2(); let r = c.a.wrapping_add(c.op); c.ccr.add8(c.a, c.op, r); c.a = r; });
    t[0xbb] = i(0xbb, "add", "adda", EX, true,  false, 3, 4, |c| { c.extend(); let r = c.a.wrapping_add(c.op); c.ccr.add8(c.a, c.op, r); c.a = r; });
    t[0xcb] = i(0xcb, "add", "addb", IM, false, false, 2, 2, |c| { c.immed2(); let r = c.b.wrapping_add(c.op); c.ccr.add8(c.b, c.op, r); c.b = r; });
    t[0xdb] = i(0xdb, "add", "addb", DI, true,  false, 2, 3, |c| { c.direct2(); let r = c.b.wrapping_add(c.op); c.ccr.add8(c.b, c.op, r); c.b = r; });
    t[0xeb] = i(0xeb, "add", "addb", IN, true,  false, 2, 4, |c| { c.index2(); let r = c.b.wrapping_add(c.op); c.ccr.add8(c.b, c.op, r); c.b = r; });
    t[0xfb] = i(0xfb, "add", "addb", EX, true,  false, 3, 4, |c| { c.extend(); let r = c.b.wrapping_add(c.op); c.ccr.add8(c.b, c.op, r); c.b = r; });
    t[0xc3] = i(0xc3, "add", "addd", IM, false, false, 3, 3, |c| { c.immed3(); let r = c.d().wrapping_add(c.op2); c.ccr.add16(c.d(), c.op2, r); c.set_d(r); });
    t[0xd3] = i(0xd3, "add", "addd", DI, true,  false, 2, 4, |c| { c.direct16(); let r = c.d().wrapping_add(c.op2); c.ccr.add16(c.d(), c.op2, r); c.set_d(r); });
    t[0xe3] = i(0xe3, "add", "addd", IN, true,  false, 2, 5, |c| { c.index16(); let r = c.d().wrapping_add(c.op2); c.ccr.add16(c.d(), c.op2, r); c.set_d(r); });
    t[0xf3] = i(0xf3, "add", "addd", EX, true,  false, 3, 5, |c| { c.extend16(); let r = c.d().wrapping_add(c.op2); c.ccr.add16(c.d(), c.op2, r); c.set_d(r); });
    t[0x61] = i(0x61, "and", "aim ", IN, false, true,  3, 7, |c| { c.index3(); let a = c.addr as usize; c.memory[a] &= c.op; let r = c.memory[a]; c.ccr.log8(r); });
    t[0x71] = i(0x71, "and", "aim ", DI, false, true,  3, 6, |c| { c.direct3(); let a = c.addr as usize; c.memory[a] &= c.op; let r = c.memory[a]; c.ccr.log8(r); });
    t[0x84] = i(0x84, "and", "anda", IM, false, false, 2, 2, |c| { c.immed2(); c.a &= c.op; let r = c.a; c.ccr.log8(r); });
    t[0x94] = i(0x94, "and", "anda", DI, true,  false, 2, 3, |c| { c.direct2(); c.a &= c.op; let r = c.a; c.ccr.log8(r); });
    t[0xa4] = i(0xa4, "and", "anda", IN, true,  false, 2, 4, |c| { c.index2(); c.a &= c.op; let r = c.a; c.ccr.log8(r); });
    t[0xb4] = i(0xb4, "and", "anda", EX, true,  false, 3, 4, |c| { c.extend(); c.a &= c.op; let r = c.a; c.ccr.log8(r); });
    t[0xc4] = i(0xc4, "and", "andb", IM, false, false, 2, 2, |c| { c.immed2(); c.b &= c.op; let r = c.b; c.ccr.log8(r); });
    t[0xd4] = i(0xd4, "and", "andb", DI, true,  false, 2, 3, |c| { c.direct2(); c.b &= c.op; let r = c.b; c.ccr.log8(r); });
    t[0xe4] = i(0xe4, "and", "andb", IN, true,  false, 2, 4, |c| { c.index2(); c.b &= c.op; let r = c.b; c.ccr.log8(r); });
    t[0xf4] = i(0xf4, "and", "andb", EX, true,  false, 3, 4, |c| { c.extend(); c.b &= c.op; let r = c.b; c.ccr.log8(r); });
    t[0x68] = i(0x68, "asl", "asl ", IN, true,  true,  2, 6, |c| { c.index2(); let a = c.addr as usize; let v = c.ccr.asl(c.memory[a]); c.memory[a] = v; });
    t[0x78] = i(0x78, "asl", "asl ", EX, true,  true,  3, 6, |c| { c.extend(); let a = c.addr as usize; let v = c.ccr.asl(c.memory[a]); c.memory[a] = v; });
    t[0x48] = i(0x48, "asl", "asla", ID, false, false, 1, 1, |c| { c.implied(); c.a = c.ccr.asl(c.a); });
    t[0x58] = i(0x58, "asl", "aslb", ID, false, false, 1, 1, |c| { c.implied(); c.b = c.ccr.asl(c.b); });
    t[0x05] = i(0x05, "asl", "asld", ID, false, false, 1, 1, |c| { c.implied(); let v = c.ccr.asld(c.d()); c.set_d(v); });
    t[0x67] = i(0x67, "asr", "asr ", IN, true,  true,  2, 6, |c| { c.index2(); let a = c.addr as usize; let v = c.ccr.asr(c.memory[a]); c.memory[a] = v; });
    t[0x77] = i(0x77, "asr", "asr ", EX, true,  true,  3, 6, |c| { c.extend(); let a = c.addr as usize; let v = c.ccr.asr(c.memory[a]); c.memory[a] = v; });
    t[0x47] = i(0x47, "asr", "asra", ID, false, false, 1, 1, |c| { c.implied(); c.a = c.ccr.asr(c.a); });
    t[0x57] = i(0x57, "asr", "asrb", ID, false, false, 1, 1, |c| { c.implied(); c.b = c.ccr.asr(c.b); });
    t[0x85] = i(0x85, "bit", "bita", IM, false, false, 2, 2, |c| { c.immed2(); let r = c.a & c.op; c.ccr.log8(r); });
    t[0x95] = i(0x95, "bit", "bita", DI, true,  false, 2, 3, |c| { c.direct2(); let r = c.a & c.op; c.ccr.log8(r); });
    t[0xa5] = i(0xa5, "bit", "bita", IN, true,  false, 2, 4, |c| { c.index2(); let r = c.a & c.op; c.ccr.log8(r); });
    t[0xb5] = i(0xb5, "bit", "bita", EX, true,  false, 3, 4, |c| { c.extend(); let r = c.a & c.op; c.ccr.log8(r); });
    t[0xc5] = i(0xc5, "bit", "bitb", IM, false, false, 2, 2, |c| { c.immed2(); let r = c.b & c.op; c.ccr.log8(r); });
    t[0xd5] = i(0xd5, "bit", "bitb", DI, true,  false, 2, 3, |c| { c.direct2(); let r = c.b & c.op; c.ccr.log8(r); });
    t[0xe5] = i(0xe5, "bit", "bitb", IN, true,  false, 2, 4, |c| { c.index2(); let r = c.b & c.op; c.ccr.log8(r); });
    t[0xf5] = i(0xf5, "bit", "bitb", EX, true,  false, 3, 4, |c| { c.extend(); let r = c.b & c.op; c.ccr.log8(r); });
    t[0x24] = i(0x24, "bra", "bcc ", IM, false, false, 2, 3, |c| { c.immed2(); let cond = !c.ccr.c; c.bra(cond); });
    t[0x25] = i(0x25, "bra", "bcs ", IM, false, false, 2, 3, |c| { c.immed2(); let cond = c.ccr.c; c.bra(cond); });
    t[0x27] = i(0x27, "bra", "beq ", IM, false, false, 2, 3, |c| { c.immed2(); let cond = c.ccr.z; c.bra(cond); });
    t[0x2c] = i(0x2c, "bra", "bge ", IM, false, false, 2, 3, |c| { c.immed2(); let cond = c.ccr.n == c.ccr.v; c.bra(cond); });
    t[0x2e] = i(0x2e, "bra", "bgt ", IM, false, false, 2, 3, |c| { c.immed2(); let cond = !(c.ccr.z || (c.ccr.n != c.ccr.v)); c.bra(cond); });
    t[0x22] = i(0x22, "bra", "bhi ", IM, false, false, 2, 3, |c| { c.immed2(); let cond = !(c.ccr.c || c.ccr.z); c.bra(cond); });
    t[0x2f] = i(0x2f, "bra", "ble ", IM, false, false, 2, 3, |c| { c.immed2(); let cond = c.ccr.z || (c.ccr.n != c.ccr.v); c.bra(cond); });
    t[0x23] = i(0x23, "bra", "bls ", IM, false, false, 2, 3, |c| { c.immed2(); let cond = c.ccr.c || c.ccr.z; c.bra(cond); });
    t[0x2d] = i(0x2d, "bra", "blt ", IM, false, false, 2, 3, |c| { c.immed2(); let cond = c.ccr.n != c.ccr.v; c.bra(cond); });
    t[0x2b] = i(0x2b, "bra", "bmi ", IM, false, false, 2, 3, |c| { c.immed2(); let cond = c.ccr.n; c.bra(cond); });
    t[0x26] = i(0x26, "bra", "bne ", IM, false, false, 2, 3, |c| { c.immed2(); let cond = !c.ccr.z; c.bra(cond); });
    t[0x2a] = i(0x2a, "bra", "bpl ", IM, false, false, 2, 3, |c| { c.immed2(); let cond = !c.ccr.n; c.bra(cond); });
    t[0x20] = i(0x20, "bra", "bra ", IM, false, false, 2, 3, |c| { c.immed2(); c.bra(true); });
    t[0x21] = i(0x21, "bra", "brn ", IM, false, false, 2, 3, |c| { c.immed2(); c.bra(false); });
    t[0x28] = i(0x28, "bra", "bvc ", IM, false, false, 2, 3, |c| { c.immed2(); let cond = !c.ccr.v; c.bra(cond); });
    t[0x29] = i(0x29, "bra", "bvs ", IM, false, false, 2, 3, |c| { c.immed2(); let cond = c.ccr.v; c.bra(cond); });
    t[0x8d] = i(0x8d, "bsr", "bsr ", IM, false, false, 2, 5, |c| { c.immed2(); c.bsr(); });
    t[0x0c] = i(0x0c, "clr", "clc ", ID, false, false, 1, 1, |c| { c.implied(); c.ccr.c = false; });
    t[0x0e] = i(0x0e, "clr", "cli ", ID, false, false, 1, 1, |c| { c.implied(); c.ccr.i = false; });
    t[0x6f] = i(0x6f, "clr", "clr ", IN, true,  true,  2, 5, |c| { c.index2(); c.memory[c.addr as usize] = 0; c.ccr.n = false; c.ccr.v = false; c.ccr.c = false; c.ccr.z = true; });
    t[0x7f] = i(0x7f, "clr", "clr ", EX, true,  true,  3, 5, |c| { c.extend(); c.memory[c.addr as usize] = 0; c.ccr.n = false; c.ccr.v = false; c.ccr.c = false; c.ccr.z = true; });
    t[0x4f] = i(0x4f, "clr", "clra", ID, false, false, 1, 1, |c| { c.implied(); c.a = 0; c.ccr.n = false; c.ccr.v = false; c.ccr.c = false; c.ccr.z = true; });
    t[0x5f] = i(0x5f, "clr", "clrb", ID, false, false, 1, 1, |c| { c.implied(); c.b = 0; c.ccr.n = false; c.ccr.v = false; c.ccr.c = false; c.ccr.z = true; });
    t[0x0a] = i(0x0a, "clr", "clv ", ID, false, false, 1, 1, |c| { c.implied(); c.ccr.v = false; });
    t[0x11] = i(0x11, "cmp", "cba ", ID, false, false, 1, 1, |c| { c.implied(); let r = c.a.wrapping_sub(c.b); c.ccr.sub8(c.a, c.b, r); });
    t[0x81] = i(0x81, "cmp", "cmpa", IM, false, false, 2, 2, |c| { c.immed2(); let r = c.a.wrapping_sub(c.op); c.ccr.sub8(c.a, c.op, r); });
    t[0x91] = i(0x91, "cmp", "cmpa", DI, true,  false, 2, 3, |c| { c.direct2(); let r = c.a.wrapping_sub(c.op); c.ccr.sub8(c.a, c.op, r); });
    t[0xa1] = i(0xa1, "cmp", "cmpa", IN, true,  false, 2, 4, |c| { c.index2(); let r = c.a.wrapping_sub(c.op); c.ccr.sub8(c.a, c.op, r); });
    t[0xb1] = i(0xb1, "cmp", "cmpa", EX, true,  false, 3, 4, |c| { c.extend(); let r = c.a.wrapping_sub(c.op); c.ccr.sub8(c.a, c.op, r); });
    t[0xc1] = i(0xc1, "cmp", "cmpb", IM, false, false, 2, 2, |c| { c.immed2(); let r = c.b.wrapping_sub(c.op); c.ccr.sub8(c.b, c.op, r); });
    t[0xd1] = i(0xd1, "cmp", "cmpb", DI, true,  false, 2, 3, |c| { c.direct2(); let r = c.b.wrapping_sub(c.op); c.ccr.sub8(c.b, c.op, r); });
    t[0xe1] = i(0xe1, "cmp", "cmpb", IN, true,  false, 2, 4, |c| { c.index2(); let r = c.b.wrapping_sub(c.op); c.ccr.sub8(c.b, c.op, r); });
    t[0xf1] = i(0xf1, "cmp", "cmpb", EX, true,  false, 3, 4, |c| { c.extend(); let r = c.b.wrapping_sub(c.op); c.ccr.sub8(c.b, c.op, r); });
    t[0x8c] = i(0x8c, "cmp", "cpx ", IM, false, false, 3, 3, |c| { c.immed3(); let r = c.ix.wrapping_sub(c.op2); c.ccr.sub16(c.ix, c.op2, r); });
    t[0x9c] = i(0x9c, "cmp", "cpx ", DI, true,  false, 2, 4, |c| { c.direct16(); let r = c.ix.wrapping_sub(c.op2); c.ccr.sub16(c.ix, c.op2, r); });
    t[0xac] = i(0xac, "cmp", "cpx ", IN, true,  false, 2, 5, |c| { c.index16(); let r = c.ix.wrapping_sub(c.op2); c.ccr.sub16(c.ix, c.op2, r); });
    t[0xbc] = i(0xbc, "cmp", "cpx ", EX, true,  false, 3, 5, |c| { c.extend16(); let r = c.ix.wrapping_sub(c.op2); c.ccr.sub16(c.ix, c.op2, r); });
    t[0x63] = i(0x63, "com", "com ", IN, true,  true,  2, 6, |c| { c.index2(); let a = c.addr as usize; c.memory[a] = !c.op; c.ccr.c = true; let r = c.memory[a]; c.ccr.log8(r); });
    t[0x73] = i(0x73, "com", "com ", EX, true,  true,  3, 6, |c| { c.extend(); let a = c.addr as usize; c.memory[a] = !c.op; c.ccr.c = true; let r = c.memory[a]; c.ccr.log8(r); });
    t[0x43] = i(0x43, "com", "coma", ID, false, false, 1, 1, |c| { c.implied(); c.a = !c.a; c.ccr.c = true; let r = c.a; c.ccr.log8(r); });
    t[0x53] = i(0x53, "com", "comb", ID, false, false, 1, 1, |c| { c.implied(); c.b = !c.b; c.ccr.c = true; let r = c.b; c.ccr.log8(r); });
    t[0x19] = i(0x19, "daa", "daa ", ID, false, false, 1, 2, |c| { c.implied(); c.a = c.ccr.daa(c.a); });
    t[0x6a] = i(0x6a, "dec", "dec ", IN, true,  true,  2, 6, |c| { c.index2(); let a = c.addr as usize; let v = c.memory[a].wrapping_sub(1); c.memory[a] = v; c.ccr.dec8(v); });
    t[0x7a] = i(0x7a, "dec", "dec ", EX, true,  true,  3, 6, |c| { c.extend(); let a = c.addr as usize; let v = c.memory[a].wrapping_sub(1); c.memory[a] = v; c.ccr.dec8(v); });
    t[0x4a] = i(0x4a, "dec", "deca", ID, false, false, 1, 1, |c| { c.implied(); c.a = c.a.wrapping_sub(1); let r = c.a; c.ccr.dec8(r); });
    t[0x5a] = i(0x5a, "dec", "decb", ID, false, false, 1, 1, |c| { c.implied(); c.b = c.b.wrapping_sub(1); let r = c.b; c.ccr.dec8(r); });
    t[0x34] = i(0x34, "dec", "des ", ID, false, false, 1, 1, |c| { c.implied(); c.sp = c.sp.wrapping_sub(1); });
    t[0x09] = i(0x09, "dec", "dex ", ID, false, false, 1, 1, |c| { c.implied(); c.ix = c.ix.wrapping_sub(1); c.ccr.z = c.ix == 0; });
    t[0x65] = i(0x65, "eor", "eim ", IN, false, true,  3, 7, |c| { c.index3(); let a = c.addr as usize; c.memory[a] ^= c.op; let r = c.memory[a]; c.ccr.log8(r); });
    t[0x75] = i(0x75, "eor", "eim ", DI, false, true,  3, 6, |c| { c.direct3(); let a = c.addr as usize; c.memory[a] ^= c.op; let r = c.memory[a]; c.ccr.log8(r); });
    t[0x88] = i(0x88, "eor", "eora", IM, false, false, 2, 2, |c| { c.immed2(); c.a ^= c.op; let r = c.a; c.ccr.log8(r); });
    t[0x98] = i(0x98, "eor", "eora", DI, true,  false, 2, 3, |c| { c.direct2(); c.a ^= c.op; let r = c.a; c.ccr.log8(r); });
    t[0xa8] = i(0xa8, "eor", "eora", IN, true,  false, 2, 4, |c| { c.index2(); c.a ^= c.op; let r = c.a; c.ccr.log8(r); });
    t[0xb8] = i(0xb8, "eor", "eora", EX, true,  false, 3, 4, |c| { c.extend(); c.a ^= c.op; let r = c.a; c.ccr.log8(r); });
    t[0xc8] = i(0xc8, "eor", "eorb", IM, false, false, 2, 2, |c| { c.immed2(); c.b ^= c.op; let r = c.b; c.ccr.log8(r); });
    t[0xd8] = i(0xd8, "eor", "eorb", DI, true,  false, 2, 3, |c| { c.direct2(); c.b ^= c.op; let r = c.b; c.ccr.log8(r); });
    t[0xe8] = i(0xe8, "eor", "eorb", IN, true,  false, 2, 4, |c| { c.index2(); c.b ^= c.op; let r = c.b; c.ccr.log8(r); });
    t[0xf8] = i(0xf8, "eor", "eorb", EX, true,  false, 3, 4, |c| { c.extend(); c.b ^= c.op; let r = c.b; c.ccr.log8(r); });
    t[0x18] = i(0x18, "exg", "xgdx", ID, false, false, 1, 2, |c| { c.implied(); let tmp = c.ix; c.ix = c.d(); c.set_d(tmp); });
    t[0x6c] = i(0x6c, "inc", "inc ", IN, true,  true,  2, 6, |c| { c.index2(); let a = c.addr as usize; let v = c.memory[a].wrapping_add(1); c.memory[a] = v; c.ccr.inc8(v); });
    t[0x7c] = i(0x7c, "inc", "inc ", EX, true,  true,  3, 6, |c| { c.extend(); let a = c.addr as usize; let v = c.memory[a].wrapping_add(1); c.memory[a] = v; c.ccr.inc8(v); });
    t[0x4c] = i(0x4c, "inc", "inca", ID, false, false, 1, 1, |c| { c.implied(); c.a = c.a.wrapping_add(1); let r = c.a; c.ccr.inc8(r); });
    t[0x5c] = i(0x5c, "inc", "incb", ID, false, false, 1, 1, |c| { c.implied(); c.b = c.b.wrapping_add(1); let r = c.b; c.ccr.inc8(r); });
    t[0x31] = i(0x31, "inc", "ins ", ID, false, false, 1, 1, |c| { c.implied(); c.sp = c.sp.wrapping_add(1); });
    t[0x08] = i(0x08, "inc", "inx ", ID, false, false, 1, 1, |c| { c.implied(); c.ix = c.ix.wrapping_add(1); c.ccr.z = c.ix == 0; });
    t[0x6e] = i(0x6e, "jmp", "jmp ", IN, true,  false, 2, 3, |c| { c.index2(); c.pc = c.addr; });
    t[0x7e] = i(0x7e, "jmp", "jmp ", EX, true,  false, 3, 3, |c| { c.extend(); c.pc = c.addr; });
    t[0x9d] = i(0x9d, "jsr", "jsr ", DI, true,  true,  2, 5, |c| { c.direct2(); let pc = c.pc; c.push16(pc); c.pc = c.addr; });
    t[0xad] = i(0xad, "jsr", "jsr ", IN, true,  true,  2, 5, |c| { c.index2(); let pc = c.pc; c.push16(pc); c.pc = c.addr; });
    t[0xbd] = i(0xbd, "jsr", "jsr ", EX, true,  true,  3, 6, |c| { c.extend(); let pc = c.pc; c.push16(pc); c.pc = c.addr; });
    t[0x86] = i(0x86, "ld ", "ldaa", IM, false, false, 2, 2, |c| { c.immed2(); c.a = c.op; let r = c.a; c.ccr.log8(r); });
    t[0x96] = i(0x96, "ld ", "ldaa", DI, true,  false, 2, 3, |c| { c.direct2(); c.a = c.op; let r = c.a; c.ccr.log8(r); });
    t[0xa6] = i(0xa6, "ld ", "ldaa", IN, true,  false, 2, 4, |c| { c.index2(); c.a = c.op; let r = c.a; c.ccr.log8(r); });
    t[0xb6] = i(0xb6, "ld ", "ldaa", EX, true,  false, 3, 4, |c| { c.extend(); c.a = c.op; let r = c.a; c.ccr.log8(r); });
    t[0xc6] = i(0xc6, "ld ", "ldab", IM, false, false, 2, 2, |c| { c.immed2(); c.b = c.op; let r = c.b; c.ccr.log8(r); });
    t[0xd6] = i(0xd6, "ld ", "ldab", DI, true,  false, 2, 3, |c| { c.direct2(); c.b = c.op; let r = c.b; c.ccr.log8(r); });
    t[0xe6] = i(0xe6, "ld ", "ldab", IN, true,  false, 2, 4, |c| { c.index2(); c.b = c.op; let r = c.b; c.ccr.log8(r); });
    t[0xf6] = i(0xf6, "ld ", "ldab", EX, true,  false, 3, 4, |c| { c.extend(); c.b = c.op; let r = c.b; c.ccr.log8(r); });
    t[0xcc] = i(0xcc, "ld ", "ldd ", IM, false, false, 3, 3, |c| { c.immed3(); let v = c.op2; c.set_d(v); c.ccr.log16(v); });
    t[0xdc] = i(0xdc, "ld ", "ldd ", DI, true,  false, 2, 4, |c| { c.direct2(); let v = c.get16(c.addr); c.set_d(v); c.ccr.log16(v); });
    t[0xec] = i(0xec, "ld ", "ldd ", IN, true,  false, 2, 5, |c| { c.index2(); let v = c.get16(c.addr); c.set_d(v); c.ccr.log16(v); });
    t[0xfc] = i(0xfc, "ld ", "ldd ", EX, true,  false, 3, 5, |c| { c.extend(); let v = c.get16(c.addr); c.set_d(v); c.ccr.log16(v); });
    t[0x8e] = i(0x8e, "ld ", "lds ", IM, false, false, 3, 3, |c| { c.immed3(); c.sp = c.op2; let r = c.sp; c.ccr.log16(r); });
    t[0x9e] = i(0x9e, "ld ", "lds ", DI, true,  false, 2, 4, |c| { c.direct2(); c.sp = c.get16(c.addr); let r = c.sp; c.ccr.log16(r); });
    t[0xae] = i(0xae, "ld ", "lds ", IN, true,  false, 2, 5, |c| { c.index2(); c.sp = c.get16(c.addr); let r = c.sp; c.ccr.log16(r); });
    t[0xbe] = i(0xbe, "ld ", "lds ", EX, true,  false, 3, 5, |c| { c.extend(); c.sp = c.get16(c.addr); let r = c.sp; c.ccr.log16(r); });
    t[0xce] = i(0xce, "ld ", "ldx ", IM, false, false, 3, 3, |c| { c.immed3(); c.ix = c.op2; let r = c.ix; c.ccr.log16(r); });
    t[0xde] = i(0xde, "ld ", "ldx ", DI, true,  false, 2, 4, |c| { c.direct2(); c.ix = c.get16(c.addr); let r = c.ix; c.ccr.log16(r); });
    t[0xee] = i(0xee, "ld ", "ldx ", IN, true,  false, 2, 5, |c| { c.index2(); c.ix = c.get16(c.addr); let r = c.ix; c.ccr.log16(r); });
    t[0xfe] = i(0xfe, "ld ", "ldx ", EX, true,  false, 3, 5, |c| { c.extend(); c.ix = c.get16(c.addr); let r = c.ix; c.ccr.log16(r); });
    t[0x64] = i(0x64, "lsr", "lsr ", IN, true,  true,  2, 6, |c| { c.index2(); let a = c.addr as usize; let v = c.ccr.lsr(c.memory[a]); c.memory[a] = v; });
    t[0x74] = i(0x74, "lsr", "lsr ", EX, true,  true,  3, 6, |c| { c.extend(); let a = c.addr as usize; let v = c.ccr.lsr(c.memory[a]); c.memory[a] = v; });
    t[0x44] = i(0x44, "lsr", "lsra", ID, false, false, 1, 1, |c| { c.implied(); c.a = c.ccr.lsr(c.a); });
    t[0x54] = i(0x54, "lsr", "lsrb", ID, false, false, 1, 1, |c| { c.implied(); c.b = c.ccr.lsr(c.b); });
    t[0x04] = i(0x04, "lsr", "lsrd", ID, false, false, 1, 1, |c| { c.implied(); let v = c.ccr.lsrd(c.d()); c.set_d(v); });
    t[0x3d] = i(0x3d, "mul", "mul ", ID, false, false, 1, 7, |c| { c.implied(); let d = (c.a as u16) * (c.b as u16); c.set_d(d); c.ccr.c = d & (1 << 7) != 0; });
    t[0x60] = i(0x60, "neg", "neg ", IN, true,  true,  2, 6, |c| { c.index2(); let a = c.addr as usize; let v = c.op.wrapping_neg(); c.memory[a] = v; c.ccr.inc8(v); c.ccr.c = !c.ccr.z; });
    t[0x70] = i(0x70, "neg", "neg ", EX, true,  true,  3, 6, |c| { c.extend(); let a = c.addr as usize; let v = c.op.wrapping_neg(); c.memory[a] = v; c.ccr.inc8(v); c.ccr.c = !c.ccr.z; });
    t[0x40] = i(0x40, "neg", "nega", ID, false, true,  1, 1, |c| { c.implied(); c.a = c.a.wrapping_neg(); let r = c.a; c.ccr.inc8(r); c.ccr.c = !c.ccr.z; });
    t[0x50] = i(0x50, "neg", "negb", ID, false, true,  1, 1, |c| { c.implied(); c.b = c.b.wrapping_neg(); let r = c.b; c.ccr.inc8(r); c.ccr.c = !c.ccr.z; });
    t[0x01] = i(0x01, "nop", "nop ", ID, false, false, 1, 1, |c| { c.implied(); });
    t[0x62] = i(0x62, "or ", "oim ", IN, false, true,  3, 7, |c| { c.index3(); let a = c.addr as usize; c.memory[a] |= c.op; let r = c.memory[a]; c.ccr.log8(r); });
    t[0x72] = i(0x72, "or ", "oim ", DI, false, true,  3, 6, |c| { c.direct3(); let a = c.addr as usize; c.memory[a] |= c.op; let r = c.memory[a]; c.ccr.log8(r); });
    t[0x8a] = i(0x8a, "or ", "oraa", IM, false, false, 2, 2, |c| { c.immed2(); c.a |= c.op; let r = c.a; c.ccr.log8(r); });
    t[0x9a] = i(0x9a, "or ", "oraa", DI, true,  false, 2, 3, |c| { c.direct2(); c.a |= c.op; let r = c.a; c.ccr.log8(r); });
    t[0xaa] = i(0xaa, "or ", "oraa", IN, true,  false, 2, 4, |c| { c.index2(); c.a |= c.op; let r = c.a; c.ccr.log8(r); });
    t[0xba] = i(0xba, "or ", "oraa", EX, true,  false, 3, 4, |c| { c.extend(); c.a |= c.op; let r = c.a; c.ccr.log8(r); });
    t[0xca] = i(0xca, "or ", "orab", IM, false, false, 2, 2, |c| { c.immed2(); c.b |= c.op; let r = c.b; c.ccr.log8(r); });
    t[0xda] = i(0xda, "or ", "orab", DI, true,  false, 2, 3, |c| { c.direct2(); c.b |= c.op; let r = c.b; c.ccr.log8(r); });
    t[0xea] = i(0xea, "or ", "orab", IN, true,  false, 2, 4, |c| { c.index2(); c.b |= c.op; let r = c.b; c.ccr.log8(r); });
    t[0xfa] = i(0xfa, "or ", "orab", EX, true,  false, 3, 4, |c| { c.extend(); c.b |= c.op; let r = c.b; c.ccr.log8(r); });
    t[0x32] = i(0x32, "pull", "pula", ID, false, false, 1, 3, |c| { c.implied(); c.a = c.pull8(); });
    t[0x33] = i(0x33, "pull", "pulb", ID, false, false, 1, 3, |c| { c.implied(); c.b = c.pull8(); });
    t[0x38] = i(0x38, "pull", "pulx", ID, false, false, 1, 4, |c| { c.implied(); c.ix = c.pull16(); });
    t[0x36] = i(0x36, "push", "psha", ID, false, true,  1, 4, |c| { c.implied(); let a = c.a; c.push8(a); });
    t[0x37] = i(0x37, "push", "pshb", ID, false, true,  1, 4, |c| { c.implied(); let b = c.b; c.push8(b); });
    t[0x3c] = i(0x3c, "push", "pshx", ID, false, true,  1, 5, |c| { c.implied(); let ix = c.ix; c.push16(ix); });
    t[0x69] = i(0x69, "rol", "rol ", IN, true,  true,  2, 6, |c| { c.index2(); let a = c.addr as usize; let v = c.ccr.rol(c.memory[a]); c.memory[a] = v; });
    t[0x79] = i(0x79, "rol", "rol ", EX, true,  true,  3, 6, |c| { c.extend(); let a = c.addr as usize; let v = c.ccr.rol(c.memory[a]); c.memory[a] = v; });
    t[0x49] = i(0x49, "rol", "rola", ID, false, false, 1, 1, |c| { c.implied(); c.a = c.ccr.rol(c.a); });
    t[0x59] = i(0x59, "rol", "rolb", ID, false, false, 1, 1, |c| { c.implied(); c.b = c.ccr.rol(c.b); });
    t[0x66] = i(0x66, "ror", "ror ", IN, true,  true,  2, 6, |c| { c.index2(); let a = c.addr as usize; let v = c.ccr.ror(c.memory[a]); c.memory[a] = v; });
    t[0x76] = i(0x76, "ror", "ror ", EX, true,  true,  3, 6, |c| { c.extend(); let a = c.addr as usize; let v = c.ccr.ror(c.memory[a]); c.memory[a] = v; });
    t[0x46] = i(0x46, "ror", "rora", ID, false, false, 1, 1, |c| { c.implied(); c.a = c.ccr.ror(c.a); });
    t[0x56] = i(0x56, "ror", "rorb", ID, false, false, 1, 1, |c| { c.implied(); c.b = c.ccr.ror(c.b); });
    t[0x3b] = i(0x3b, "rts", "rti ", ID, false, false, 1, 10, |c| { c.implied(); c.rti(); });
    t[0x39] = i(0x39, "rts", "rts ", ID, false, false, 1, 5, |c| { c.implied(); c.pc = c.pull16(); });
    t[0x82] = i(0x82, "sbc", "sbca", IM, false, false, 2, 2, |c| { c.immed2(); let r = c.a.wrapping_sub(c.op).wrapping_sub(c.ccr.c as u8); c.ccr.sub8(c.a, c.op, r); c.a = r; });
    t[0x92] = i(0x92, "sbc", "sbca", DI, true,  false, 2, 3, |c| { c.direct2(); let r = c.a.wrapping_sub(c.op).wrapping_sub(c.ccr.c as u8); c.ccr.sub8(c.a, c.op, r); c.a = r; });
    t[0xa2] = i(0xa2, "sbc", "sbca", IN, true,  false, 2, 4, |c| { c.index2(); let r = c.a.wrapping_sub(c.op).wrapping_sub(c.ccr.c as u8); c.ccr.sub8(c.a, c.op, r); c.a = r; });
    t[0xb2] = i(0xb2, "sbc", "sbca", EX, true,  false, 3, 4, |c| { c.extend(); let r = c.a.wrapping_sub(c.op).wrapping_sub(c.ccr.c as u8); c.ccr.sub8(c.a, c.op, r); c.a = r; });
    t[0xc2] = i(0xc2, "sbc", "sbcb", IM, false, false, 2, 2, |c| { c.immed2(); let r = c.b.wrapping_sub(c.op).wrapping_sub(c.ccr.c as u8); c.ccr.sub8(c.b, c.op, r); c.b = r; });
    t[0xd2] = i(0xd2, "sbc", "sbcb", DI, true,  false, 2, 3, |c| { c.direct2(); let r = c.b.wrapping_sub(c.op).wrapping_sub(c.ccr.c as u8); c.ccr.sub8(c.b, c.op, r); c.b = r; });
    t[0xe2] = i(0xe2, "sbc", "sbcb", IN, true,  false, 2, 4, |c| { c.index2(); let r = c.b.wrapping_sub(c.op).wrapping_sub(c.ccr.c as u8); c.ccr.sub8(c.b, c.op, r); c.b = r; });
    t[0xf2] = i(0xf2, "sbc", "sbcb", EX, true,  false, 3, 4, |c| { c.extend(); let r = c.b.wrapping_sub(c.op).wrapping_sub(c.ccr.c as u8); c.ccr.sub8(c.b, c.op, r); c.b = r; });
    t[0x0d] = i(0x0d, "set", "sec ", ID, false, false, 1, 1, |c| { c.implied(); c.ccr.c = true; });
    t[0x0f] = i(0x0f, "set", "sei ", ID, false, false, 1, 1, |c| { c.implied(); c.ccr.i = true; });
    t[0x0b] = i(0x0b, "set", "sev ", ID, false, false, 1, 1, |c| { c.implied(); c.ccr.v = true; });
    t[0x97] = i(0x97, "st ", "staa", DI, true,  true,  2, 3, |c| { c.direct2(); c.memory[c.addr as usize] = c.a; let r = c.a; c.ccr.log8(r); });
    t[0xa7] = i(0xa7, "st ", "staa", IN, true,  true,  2, 4, |c| { c.index2(); c.memory[c.addr as usize] = c.a; let r = c.a; c.ccr.log8(r); });
    t[0xb7] = i(0xb7, "st ", "staa", EX, true,  true,  3, 4, |c| { c.extend(); c.memory[c.addr as usize] = c.a; let r = c.a; c.ccr.log8(r); });
    t[0xd7] = i(0xd7, "st ", "stab", DI, true,  true,  2, 3, |c| { c.direct2(); c.memory[c.addr as usize] = c.b; let r = c.b; c.ccr.log8(r); });
    t[0xe7] = i(0xe7, "st ", "stab", IN, true,  true,  2, 4, |c| { c.index2(); c.memory[c.addr as usize] = c.b; let r = c.b; c.ccr.log8(r); });
    t[0xf7] = i(0xf7, "st ", "stab", EX, true,  true,  3, 4, |c| { c.extend(); c.memory[c.addr as usize] = c.b; let r = c.b; c.ccr.log8(r); });
    t[0xdd] = i(0xdd, "st ", "std ", DI, true,  true,  2, 4, |c| { c.direct2(); let d = c.d(); c.put16(c.addr, d); c.ccr.log16(d); });
    t[0xed] = i(0xed, "st ", "std ", IN, true,  true,  2, 5, |c| { c.index2(); let d = c.d(); c.put16(c.addr, d); c.ccr.log16(d); });
    t[0xfd] = i(0xfd, "st ", "std ", EX, true,  true,  3, 5, |c| { c.extend(); let d = c.d(); c.put16(c.addr, d); c.ccr.log16(d); });
    t[0x9f] = i(0x9f, "st ", "sts ", DI, true,  true,  2, 4, |c| { c.direct2(); let sp = c.sp; c.put16(c.addr, sp); c.ccr.log16(sp); });
    t[0xaf] = i(0xaf, "st ", "sts ", IN, true,  true,  2, 5, |c| { c.index2(); let sp = c.sp; c.put16(c.addr, sp); c.ccr.log16(sp); });
    t[0xbf] = i(0xbf, "st ", "sts ", EX, true,  true,  3, 5, |c| { c.extend(); let sp = c.sp; c.put16(c.addr, sp); c.ccr.log16(sp); });
    t[0xdf] = i(0xdf, "st ", "stx ", DI, true,  true,  2, 4, |c| { c.direct2(); let ix = c.ix; c.put16(c.addr, ix); c.ccr.log16(ix); });
    t[0xef] = i(0xef, "st ", "stx ", IN, true,  true,  2, 5, |c| { c.index2(); let ix = c.ix; c.put16(c.addr, ix); c.ccr.log16(ix); });
    t[0xff] = i(0xff, "st ", "stx ", EX, true,  true,  3, 5, |c| { c.extend(); let ix = c.ix; c.put16(c.addr, ix); c.ccr.log16(ix); });
    t[0x10] = i(0x10, "sub", "sba ", ID, false, false, 1, 1, |c| { c.implied(); let r = c.a.wrapping_sub(c.b); c.ccr.sub8(c.a, c.b, r); c.a = r; });
    t[0x80] = i(0x80, "sub", "suba", IM, false, false, 2, 2, |c| { c.immed2(); let r = c.a.wrapping_sub(c.op); c.ccr.sub8(c.a, c.op, r); c.a = r; });
    t[0x90] = i(0x90, "sub", "suba", DI, true,  false, 2, 3, |c| { c.direct2(); let r = c.a.wrapping_sub(c.op); c.ccr.sub8(c.a, c.op, r); c.a = r; });
    t[0xa0] = i(0xa0, "sub", "suba", IN, true,  false, 2, 4, |c| { c.index2(); let r = c.a.wrapping_sub(c.op); c.ccr.sub8(c.a, c.op, r); c.a = r; });
    t[0xb0] = i(0xb0, "sub", "suba", EX, true,  false, 3, 4, |c| { c.extend(); let r = c.a.wrapping_sub(c.op); c.ccr.sub8(c.a, c.op, r); c.a = r; });
    t[0xc0] = i(0xc0, "sub", "subb", IM, false, false, 2, 2, |c| { c.immed2(); let r = c.b.wrapping_sub(c.op); c.ccr.sub8(c.b, c.op, r); c.b = r; });
    t[0xd0] = i(0xd0, "sub", "subb", DI, true,  false, 2, 3, |c| { c.direct2(); let r = c.b.wrapping_sub(c.op); c.ccr.sub8(c.b, c.op, r); c.b = r; });
    t[0xe0] = i(0xe0, "sub", "subb", IN, true,  false, 2, 4, |c| { c.index2(); let r = c.b.wrapping_sub(c.op); c.ccr.sub8(c.b, c.op, r); c.b = r; });
    t[0xf0] = i(0xf0, "sub", "subb", EX, true,  false, 3, 4, |c| { c.extend(); let r = c.b.wrapping_sub(c.op); c.ccr.sub8(c.b, c.op, r); c.b = r; });
    t[0x83] = i(0x83, "sub", "subd", IM, false, false, 3, 3, |c| { c.immed3(); let r = c.d().wrapping_sub(c.op2); c.ccr.sub16(c.d(), c.op2, r); c.set_d(r); });
    t[0x93] = i(0x93, "sub", "subd", DI, true,  false, 2, 4, |c| { c.direct16(); let r = c.d().wrapping_sub(c.op2); c.ccr.sub16(c.d(), c.op2, r); c.set_d(r); });
    t[0xa3] = i(0xa3, "sub", "subd", IN, true,  false, 2, 5, |c| { c.index16(); let r = c.d().wrapping_sub(c.op2); c.ccr.sub16(c.d(), c.op2, r); c.set_d(r); });
    t[0xb3] = i(0xb3, "sub", "subd", EX, true,  false, 3, 5, |c| { c.extend16(); let r = c.d().wrapping_sub(c.op2); c.ccr.sub16(c.d(), c.op2, r); c.set_d(r); });
    t[0x3f] = i(0x3f, "swi", "swi ", ID, false, false, 1, 12, |c| { c.implied(); c.swi(); });
    t[0x16] = i(0x16, "tfr", "tab ", ID, false, false, 1, 1, |c| { c.implied(); c.b = c.a; let r = c.b; c.ccr.log8(r); });
    t[0x06] = i(0x06, "tfr", "tap ", ID, false, false, 1, 1, |c| { c.implied(); let a = c.a; c.ccr.set_byte(a); });
    t[0x17] = i(0x17, "tfr", "tba ", ID, false, false, 1, 1, |c| { c.implied(); c.a = c.b; let r = c.a; c.ccr.log8(r); });
    t[0x07] = i(0x07, "tfr", "tpa ", ID, false, false, 1, 1, |c| { c.implied(); c.a = c.ccr.to_byte(); });
    t[0x30] = i(0x30, "tfr", "tsx ", ID, false, false, 1, 1, |c| { c.implied(); c.ix = c.sp.wrapping_add(1); });
    t[0x35] = i(0x35, "tfr", "txs ", ID, false, false, 1, 1, |c| { c.implied(); c.sp = c.ix.wrapping_sub(1); });
    t[0x6b] = i(0x6b, "tst", "tim ", IN, true,  false, 3, 5, |c| { c.index3(); let r = c.memory[c.addr as usize] & c.op; c.ccr.log8(r); });
    t[0x7b] = i(0x7b, "tst", "tim ", DI, true,  false, 3, 4, |c| { c.direct3(); let r = c.memory[c.addr as usize] & c.op; c.ccr.log8(r); });
    t[0x6d] = i(0x6d, "tst", "tst ", IN, true,  false, 2, 4, |c| { c.index2(); let r = c.op; c.ccr.log8(r); });
    t[0x7d] = i(0x7d, "tst", "tst ", EX, true,  false, 3, 4, |c| { c.extend(); let r = c.op; c.ccr.log8(r); });
    t[0x4d] = i(0x4d, "tst", "tsta", ID, false, false, 1, 1, |c| { c.implied(); let r = c.a; c.ccr.log8(r); });
    t[0x5d] = i(0x5d, "tst", "tstb", ID, false, false, 1, 1, |c| { c.implied(); let r = c.b; c.ccr.log8(r); });
    t[0x1a] = i(0x1a, "wait", "slp ", ID, false, false, 1, 4, |c| { c.implied(); c.slp(); });
    t[0x3e] = i(0x3e, "wait", "wai ", ID, false, false, 1, 9, |c| { c.implied(); c.wai(); });

    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_documented_opcodes() {
        let legal = INSTRUCTIONS
            .iter()
            .filter(|e| e.mode != Mode::Illegal)
            .count();
        // O HD6303R documenta este total de opcodes válidos
        assert_eq!(legal, 230);
    }

    #[test]
    fn test_entries_consistent() {
        for (n, e) in INSTRUCTIONS.iter().enumerate() {
            if e.mode == Mode::Illegal {
                continue;
            }
            assert_eq!(e.opcode as usize, n, "opcode divergente em {:02X}", n);
            assert!(e.bytes >= 1 && e.bytes <= 3);
            assert!(e.cycles >= 1 && e.cycles <= 12);
        }
    }

    #[test]
    fn test_immediate_entries_do_not_touch_memory_address() {
        // Modos imediatos nunca marcam leitura de operando em memória
        for e in INSTRUCTIONS.iter() {
            if e.mode == Mode::Immediate {
                assert!(!e.reads, "{} nao le memoria", e.name);
            }
        }
    }
}
