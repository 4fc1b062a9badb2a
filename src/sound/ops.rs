// src/sound/ops.rs

//! Banco de operadores FM: 6 operadores por 16 vozes.
//!
//! Cada tique avança um par (operador, voz): acumula a fase de 23 bits,
//! consulta o log-seno, soma envelope e a atenuação COM, desfaz o log e
//! roteia o resultado conforme a ROM de algoritmos. Depois do operador 5
//! a voz embaralhada recebe sua amostra em `out`.

use super::tables::{EXPTAB, SINTAB};

/// Estratégia de modulação de cada posição da ROM de algoritmos.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sel {
    Sel0,
    Sel1,
    Sel2,
    Sel3,
    Sel4,
    Sel5,
}

/// Uma entrada da ROM: o seletor, os bits de controle A/C/D e o índice da
/// atenuação COM.
#[derive(Clone, Copy, Debug)]
pub struct AlgoEntry {
    pub sel: Sel,
    pub a: bool,
    pub c: bool,
    pub d: bool,
    pub com: u8,
}

const fn e(sel: Sel, a: u8, c: u8, d: u8, com: u8) -> AlgoEntry {
    AlgoEntry {
        sel,
        a: a != 0,
        c: c != 0,
        d: d != 0,
        com,
    }
}

/// Ordem de saída das vozes, conforme o documento de análise técnica da
/// Yamaha. A permuta tem efeito sutil no aliasing audível.
pub const ORDER: [usize; 16] = [0, 8, 4, 12, 2, 10, 6, 14, 1, 9, 5, 13, 3, 11, 7, 15];

/// log2(n+1) em formato 4.10, para n operadores somados na mesma saída.
const COMTAB: [u16; 6] = [
    0b00000 << 7,
    0b01000 << 7,
    0b01101 << 7,
    0b10000 << 7,
    0b10011 << 7,
    0b10101 << 7,
];

#[rustfmt::skip]
static ALGO_ROM: [[AlgoEntry; 6]; 32] = {
    use Sel::{Sel0, Sel1, Sel2, Sel3, Sel4, Sel5};
    // Sinais: { SEL, A, C, D, COM }
    // OP:    6                  5                  4                  3                  2                  1
    [
        [e(Sel1,1,0,0,0), e(Sel1,0,0,0,0), e(Sel1,0,0,0,1), e(Sel0,0,0,1,0), e(Sel1,0,1,0,1), e(Sel5,0,1,1,0)], // 1
        [e(Sel1,0,0,0,0), e(Sel1,0,0,0,0), e(Sel1,0,0,0,1), e(Sel5,0,0,1,0), e(Sel1,1,1,0,1), e(Sel0,0,1,1,0)], // 2
        [e(Sel1,1,0,0,0), e(Sel1,0,0,0,1), e(Sel0,0,0,1,0), e(Sel1,0,1,0,0), e(Sel1,0,1,0,1), e(Sel5,0,1,1,0)], // 3
        [e(Sel1,0,0,0,0), e(Sel1,0,0,0,1), e(Sel0,1,0,1,0), e(Sel1,0,1,0,0), e(Sel1,0,1,0,1), e(Sel5,0,1,1,0)], // 4
        [e(Sel1,1,0,0,2), e(Sel0,0,0,1,0), e(Sel1,0,1,0,2), e(Sel0,0,1,1,0), e(Sel1,0,1,0,2), e(Sel5,0,1,1,0)], // 5
        [e(Sel1,0,0,0,2), e(Sel0,1,0,1,0), e(Sel1,0,1,0,2), e(Sel0,0,1,1,0), e(Sel1,0,1,0,2), e(Sel5,0,1,1,0)], // 6
        [e(Sel1,1,0,0,0), e(Sel0,0,0,1,0), e(Sel2,0,1,1,1), e(Sel0,0,0,1,0), e(Sel1,0,1,0,1), e(Sel5,0,1,1,0)], // 7
        [e(Sel1,0,0,0,0), e(Sel5,0,0,1,0), e(Sel2,1,1,1,1), e(Sel0,0,0,1,0), e(Sel1,0,1,0,1), e(Sel0,0,1,1,0)], // 8
        [e(Sel1,0,0,0,0), e(Sel0,0,0,1,0), e(Sel2,0,1,1,1), e(Sel5,0,0,1,0), e(Sel1,1,1,0,1), e(Sel0,0,1,1,0)], // 9
        [e(Sel0,0,0,1,0), e(Sel2,0,1,1,1), e(Sel5,0,0,1,0), e(Sel1,1,1,0,0), e(Sel1,0,1,0,1), e(Sel0,0,1,1,0)], // 10
        [e(Sel0,1,0,1,0), e(Sel2,0,1,1,1), e(Sel0,0,0,1,0), e(Sel1,0,1,0,0), e(Sel1,0,1,0,1), e(Sel5,0,1,1,0)], // 11
        [e(Sel0,0,0,1,0), e(Sel0,0,1,1,0), e(Sel2,0,1,1,1), e(Sel5,0,0,1,0), e(Sel1,1,1,0,1), e(Sel0,0,1,1,0)], // 12
        [e(Sel0,1,0,1,0), e(Sel0,0,1,1,0), e(Sel2,0,1,1,1), e(Sel0,0,0,1,0), e(Sel1,0,1,0,1), e(Sel5,0,1,1,0)], // 13
        [e(Sel0,1,0,1,0), e(Sel2,0,1,1,0), e(Sel1,0,0,0,1), e(Sel0,0,0,1,0), e(Sel1,0,1,0,1), e(Sel5,0,1,1,0)], // 14
        [e(Sel0,0,0,1,0), e(Sel2,0,1,1,0), e(Sel1,0,0,0,1), e(Sel5,0,0,1,0), e(Sel1,1,1,0,1), e(Sel0,0,1,1,0)], // 15
        [e(Sel1,1,0,0,0), e(Sel0,0,0,1,0), e(Sel1,0,1,0,0), e(Sel0,0,1,1,0), e(Sel2,0,1,1,0), e(Sel5,0,0,1,0)], // 16
        [e(Sel1,0,0,0,0), e(Sel0,0,0,1,0), e(Sel1,0,1,0,0), e(Sel5,0,1,1,0), e(Sel2,1,1,1,0), e(Sel0,0,0,1,0)], // 17
        [e(Sel1,0,0,0,0), e(Sel1,0,0,0,0), e(Sel5,0,0,1,0), e(Sel0,1,1,1,0), e(Sel2,0,1,1,0), e(Sel0,0,0,1,0)], // 18
        [e(Sel1,1,0,0,2), e(Sel4,0,0,1,2), e(Sel0,0,1,1,0), e(Sel1,0,1,0,0), e(Sel1,0,1,0,2), e(Sel5,0,1,1,0)], // 19
        [e(Sel0,0,0,1,0), e(Sel2,0,1,1,2), e(Sel5,0,0,1,0), e(Sel1,1,1,0,2), e(Sel4,0,1,1,2), e(Sel0,0,1,1,0)], // 20
        [e(Sel1,0,0,1,3), e(Sel3,0,0,1,3), e(Sel5,0,1,1,0), e(Sel1,1,1,0,3), e(Sel4,0,1,1,3), e(Sel0,0,1,1,0)], // 21
        [e(Sel1,1,0,0,3), e(Sel4,0,0,1,3), e(Sel4,0,1,1,3), e(Sel0,0,1,1,0), e(Sel1,0,1,0,3), e(Sel5,0,1,1,0)], // 22
        [e(Sel1,1,0,0,3), e(Sel4,0,0,1,3), e(Sel0,0,1,1,0), e(Sel1,0,1,0,3), e(Sel0,0,1,1,3), e(Sel5,0,1,1,0)], // 23
        [e(Sel1,1,0,0,4), e(Sel4,0,0,1,4), e(Sel4,0,1,1,4), e(Sel0,0,1,1,4), e(Sel0,0,1,1,4), e(Sel5,0,1,1,0)], // 24
        [e(Sel1,1,0,0,4), e(Sel4,0,0,1,4), e(Sel0,0,1,1,4), e(Sel0,0,1,1,4), e(Sel0,0,1,1,4), e(Sel5,0,1,1,0)], // 25
        [e(Sel0,1,0,1,0), e(Sel2,0,1,1,2), e(Sel0,0,0,1,0), e(Sel1,0,1,0,2), e(Sel0,0,1,1,2), e(Sel5,0,1,1,0)], // 26
        [e(Sel0,0,0,1,0), e(Sel2,0,1,1,2), e(Sel5,0,0,1,0), e(Sel1,1,1,0,2), e(Sel0,0,1,1,2), e(Sel0,0,1,1,0)], // 27
        [e(Sel5,0,0,1,0), e(Sel1,1,1,0,0), e(Sel1,0,1,0,2), e(Sel0,0,1,1,0), e(Sel1,0,1,0,2), e(Sel0,0,1,1,2)], // 28
        [e(Sel1,1,0,0,3), e(Sel0,0,0,1,0), e(Sel1,0,1,0,3), e(Sel0,0,1,1,3), e(Sel0,0,1,1,3), e(Sel5,0,1,1,0)], // 29
        [e(Sel5,0,0,1,0), e(Sel1,1,1,0,0), e(Sel1,0,1,0,3), e(Sel0,0,1,1,3), e(Sel0,0,1,1,3), e(Sel0,0,1,1,3)], // 30
        [e(Sel1,1,0,0,4), e(Sel0,0,0,1,4), e(Sel0,0,1,1,4), e(Sel0,0,1,1,4), e(Sel0,0,1,1,4), e(Sel5,0,1,1,0)], // 31
        [e(Sel0,1,0,1,5), e(Sel0,0,1,1,5), e(Sel0,0,1,1,5), e(Sel0,0,1,1,5), e(Sel0,0,1,1,5), e(Sel5,0,1,1,5)], // 32
    ]
};

/// Estado do banco de operadores.
pub struct Ops {
    /// Saída por voz, já na ordem embaralhada.
    pub out: [i32; 16],

    // Registradores do hardware
    phase: [[u32; 16]; 6],
    fren1: [i32; 16],
    fren2: [i32; 16],
    mren: [i32; 16],

    // Estado salvo entre posições do algoritmo
    modout: [i32; 16],
    signal: [i32; 16],
    com: [u8; 16],

    algorithm: [u8; 16],
    feedback: [u8; 16],
    key_sync: bool,
    clean: bool,
}

impl Default for Ops {
    fn default() -> Self {
        Self::new()
    }
}

impl Ops {
    pub fn new() -> Self {
        Self {
            out: [0; 16],
            phase: [[0; 16]; 6],
            fren1: [0; 16],
            fren2: [0; 16],
            mren: [0; 16],
            modout: [0; 16],
            signal: [0; 16],
            com: [0; 16],
            algorithm: [0; 16],
            feedback: [0; 16],
            key_sync: false,
            clean: false,
        }
    }

    /// Saída em resolução plena, sem o modelo do DAC.
    pub fn set_clean(&mut self, v: bool) {
        self.clean = v;
    }

    /// Programação vinda da CPU.
    /// Byte 1: mute | limpa sync | seta sync | seleção de registro (5).
    /// Byte 2: algoritmo (5) | nível de feedback (3).
    pub fn set_algorithm(&mut self, byte1: u8, byte2: u8) {
        if byte1 & (1 << 7) == 0 && byte1 & (1 << 2) == 0 {
            if byte1 & (1 << 6) != 0 {
                self.key_sync = false;
            } else if byte1 & (1 << 5) != 0 {
                self.key_sync = true;
            }
            if byte1 & (1 << 4) != 0 {
                for voice in 0..16 {
                    self.algorithm[voice] = byte2 >> 3;
                    self.feedback[voice] = byte2 & 0x7;
                }
            } else {
                self.algorithm[(byte1 & 0xF) as usize] = byte2 >> 3;
                self.feedback[(byte1 & 0xF) as usize] = byte2 & 0x7;
            }
        }
        // Modos de teste são ignorados
    }

    pub fn algorithm(&self, voice: usize) -> u8 {
        self.algorithm[voice]
    }

    pub fn key_sync(&self) -> bool {
        self.key_sync
    }

    /// Key sync zera os seis acumuladores de fase da voz.
    pub fn key_on(&mut self, voice: usize) {
        if self.key_sync {
            for op in 0..6 {
                self.phase[op][voice] = 0;
            }
        }
    }

    pub fn phase(&self, op: usize, voice: usize) -> u32 {
        self.phase[op][voice]
    }

    /// Um tique do clock mestre para um par (operador, voz).
    pub fn clock(
        &mut self,
        op: usize,
        voice: usize,
        frequency: &[[u16; 16]; 6],
        envelope: &[[u16; 16]; 6],
    ) {
        // Fase corrente, depois avança o acumulador de 23 bits
        let phi0 = self.phase[op][voice];
        self.phase[op][voice] =
            phi0.wrapping_add(EXPTAB.get22(frequency[op][voice])) & ((1 << 23) - 1);

        // Índice de 12 bits mais a modulação da posição anterior (enrola)
        let phi = (phi0 >> 11).wrapping_add(self.modout[voice] as u32);

        let mut logsin = SINTAB.lookup(phi);

        // O envelope de 12 bits sobe 2 bits para zerar o log-seno de 14
        logsin.val += envelope[op][voice] << 2;

        // COM soma atenuação
        logsin.val += COMTAB[self.com[voice] as usize];

        // Satura e complementa
        if logsin.val & 0x4000 != 0 {
            logsin.val = 0x3FFF;
        }
        logsin.val ^= 0x3FFF;

        self.signal[voice] = if self.clean {
            EXPTAB.invert_logsin_clean(logsin)
        } else {
            EXPTAB.invert_logsin(logsin)
        };

        // Roteamento do algoritmo para a próxima posição
        let algo = &ALGO_ROM[self.algorithm[voice] as usize][op];

        let mut msum = 0i32;
        if algo.c {
            msum += self.mren[voice];
        }
        if algo.d {
            msum += self.signal[voice];
        }

        self.modout[voice] = match algo.sel {
            Sel::Sel0 => 0,
            Sel::Sel1 => self.signal[voice],
            Sel::Sel2 => msum,
            Sel::Sel3 => self.mren[voice],
            Sel::Sel4 => self.fren1[voice],
            Sel::Sel5 => {
                (self.fren1[voice] + self.fren2[voice])
                    >> (1 + (7 - self.feedback[voice] as i32))
            }
        };

        self.mren[voice] = msum;
        if algo.a {
            self.fren2[voice] = self.fren1[voice];
            self.fren1[voice] = self.signal[voice];
        }
        self.com[voice] = algo.com;

        // Depois do último operador a voz embaralhada sai
        if op == 5 {
            self.out[ORDER[voice]] = self.mren[voice];
        }
    }
}
