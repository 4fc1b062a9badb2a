// src/sound/filter.rs

//! Filtros analógicos modelados: o passa-baixas de um polo que suaviza o
//! DAC de volume MIDI e o filtro de decimação Sallen-Key de 5ª ordem que
//! o hardware aplica na saída das 16 vozes.

/// Passa-baixas de um polo para o volume MIDI (10 Hz no hardware).
#[derive(Clone, Copy, Debug)]
pub struct Lp1 {
    a0: f32,
    b1: f32,
    y1: f32,
}

impl Default for Lp1 {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Lp1 {
    pub fn new(d: f32) -> Self {
        let mut f = Self {
            a0: 0.0,
            b1: 0.0,
            y1: 0.0,
        };
        f.set(d);
        f
    }

    pub fn reset(&mut self) {
        self.y1 = 0.0;
    }

    /// Ajusta pela frequência de corte normalizada (fc/fs).
    pub fn set_f(&mut self, fc: f32) {
        self.set(1.0 - (-2.0 * std::f32::consts::PI * fc).exp());
    }

    pub fn set(&mut self, d: f32) {
        self.a0 = d;
        self.b1 = 1.0 - d;
    }

    pub fn operate(&mut self, x: f32) -> f32 {
        self.y1 = self.a0 * x + self.b1 * self.y1;
        self.y1
    }
}

/// Seção passa-baixas de primeira ordem.
#[derive(Clone, Copy, Debug, Default)]
struct Lp {
    a0: f32,
    b1: f32,
    y1: f32,
    x1: f32,
}

impl Lp {
    fn operate(&mut self, s: f32) -> f32 {
        self.y1 = s + self.b1 * self.x1 - self.a0 * self.y1;
        self.x1 = s;
        self.y1
    }
}

/// Seção de segunda ordem, forma direta I.
#[derive(Clone, Copy, Debug, Default)]
struct Sos {
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    h: usize,
    x: [f32; 2],
    y: [f32; 2],
}

impl Sos {
    fn operate(&mut self, s: f32) -> f32 {
        let mut r = s;
        r += self.b1 * self.x[self.h];
        r -= self.a1 * self.y[self.h];
        self.h ^= 1;
        r += self.b2 * self.x[self.h];
        r -= self.a2 * self.y[self.h];
        self.y[self.h] = r;
        self.x[self.h] = s;
        r
    }
}

/// Filtro de decimação de 5ª ordem (topologia Sallen-Key), rodando na taxa
/// de subamostras 16 x 49.096 kHz. Introduz o ruído de aliasing presente
/// no instrumento real.
#[derive(Clone, Copy, Debug)]
pub struct Filter {
    lp: Lp,
    sos1: Sos,
    sos2: Sos,
    gain: f32,
}

impl Default for Filter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter {
    pub fn new() -> Self {
        Self {
            lp: Lp {
                b1: 1.000_006_5,
                a0: -0.947_149_4,
                y1: 0.0,
                x1: 0.0,
            },
            sos1: Sos {
                b1: 1.999_993_4,
                b2: 0.999_993_4,
                a1: -1.904_715_7,
                a2: 0.912_921_3,
                h: 0,
                x: [0.0; 2],
                y: [0.0; 2],
            },
            sos2: Sos {
                b1: 2.0,
                b2: 1.0,
                a1: -1.953_173,
                a2: 0.969_402_6,
                h: 0,
                x: [0.0; 2],
                y: [0.0; 2],
            },
            gain: 2.199_462e-7,
        }
    }

    pub fn operate(&mut self, s: f32) -> f32 {
        self.gain * self.sos2.operate(self.sos1.operate(self.lp.operate(s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lp1_converges_to_input() {
        let mut f = Lp1::new(0.0);
        f.set_f(10.6 / 48_000.0);
        let mut y = 0.0;
        for _ in 0..200_000 {
            y = f.operate(1.0);
        }
        assert!((y - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_lp1_identity_when_wide_open() {
        let mut f = Lp1::new(1.0);
        assert_eq!(f.operate(0.5), 0.5);
        assert_eq!(f.operate(-0.25), -0.25);
    }

    #[test]
    fn test_decimation_filter_unity_dc_gain() {
        let mut f = Filter::new();
        let mut y = 0.0;
        for _ in 0..100_000 {
            y = f.operate(1.0);
        }
        assert!((y - 1.0).abs() < 0.05, "ganho DC {}", y);
    }

    #[test]
    fn test_decimation_filter_attenuates_nyquist() {
        // Alternância na taxa de subamostra fica bem acima do corte
        let mut f = Filter::new();
        let mut peak = 0.0f32;
        let mut s = 1.0f32;
        for n in 0..100_000 {
            let y = f.operate(s);
            s = -s;
            if n > 50_000 {
                peak = peak.max(y.abs());
            }
        }
        assert!(peak < 1e-3);
    }

    #[test]
    fn test_filter_state_persists_across_calls() {
        let mut f = Filter::new();
        let first = f.operate(1.0);
        let second = f.operate(1.0);
        assert!(first != second); // o histórico das seções acumula
    }
}
