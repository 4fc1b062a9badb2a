// src/synth/resampler.rs

//! Conversor de taxa da saída nativa (~49.096 kHz) para a taxa do host.
//!
//! Interpolação linear sobre uma fila interna de amostras nativas, com
//! posição fracionária. O contrato com o laço de áudio: o chamador empurra
//! amostras nativas conforme gera e só puxa quando `available_output`
//! cobre o bloco inteiro, então a saída tem sempre o tamanho pedido.

use log::warn;

const QUEUE_LEN: usize = 8192;

pub struct Resampler {
    /// Passo no fluxo nativo por amostra do host (nativa/host).
    step: f64,
    /// Posição fracionária relativa à primeira amostra da fila.
    pos: f64,
    buf: Box<[f32; QUEUE_LEN]>,
    head: usize,
    len: usize,
    last: f32,
}

impl Resampler {
    /// `native_rate` e `host_rate` em Hz.
    pub fn new(native_rate: f64, host_rate: f64) -> Self {
        Self {
            step: native_rate / host_rate,
            pos: 0.0,
            buf: vec![0.0f32; QUEUE_LEN].into_boxed_slice().try_into().unwrap(),
            head: 0,
            len: 0,
            last: 0.0,
        }
    }

    pub fn set_rates(&mut self, native_rate: f64, host_rate: f64) {
        self.step = native_rate / host_rate;
    }

    fn at(&self, n: usize) -> f32 {
        self.buf[(self.head + n) & (QUEUE_LEN - 1)]
    }

    /// Empurra uma amostra nativa; estouro descarta a mais antiga.
    pub fn push(&mut self, s: f32) {
        if self.len == QUEUE_LEN {
            warn!("fila do reamostrador cheia, amostra descartada");
            self.head = (self.head + 1) & (QUEUE_LEN - 1);
            self.len -= 1;
        }
        self.buf[(self.head + self.len) & (QUEUE_LEN - 1)] = s;
        self.len += 1;
    }

    /// Quantas amostras do host dá para produzir com o que há na fila.
    pub fn available_output(&self) -> usize {
        if self.len < 2 {
            return 0;
        }
        let span = (self.len - 1) as f64 - self.pos;
        if span <= 0.0 {
            0
        } else {
            (span / self.step) as usize
        }
    }

    /// Preenche `out` inteiro. Com a fila curta a última amostra se repete
    /// (o laço de áudio evita isso conferindo `available_output` antes).
    pub fn pull(&mut self, out: &mut [f32]) {
        for slot in out.iter_mut() {
            if self.len < 2 {
                warn!("fila do reamostrador vazia");
                *slot = self.last;
                continue;
            }
            let base = self.pos.floor() as usize;
            let frac = (self.pos - base as f64) as f32;
            let a = self.at(base);
            let b = self.at(base + 1);
            self.last = a + (b - a) * frac;
            *slot = self.last;

            self.pos += self.step;
            // Consome as amostras nativas já ultrapassadas
            while self.pos >= 1.0 && self.len > 1 {
                self.head = (self.head + 1) & (QUEUE_LEN - 1);
                self.len -= 1;
                self.pos -= 1.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unity_ratio_passthrough() {
        let mut rs = Resampler::new(48_000.0, 48_000.0);
        for n in 0..64 {
            rs.push(n as f32);
        }
        let mut out = [0.0f32; 32];
        assert!(rs.available_output() >= 32);
        rs.pull(&mut out);
        for (n, s) in out.iter().enumerate() {
            assert!((s - n as f32).abs() < 1e-4);
        }
    }

    #[test]
    fn test_constant_input_constant_output() {
        let mut rs = Resampler::new(49_096.0, 48_000.0);
        for _ in 0..256 {
            rs.push(0.5);
        }
        let mut out = [0.0f32; 128];
        rs.pull(&mut out);
        for s in out.iter() {
            assert!((s - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_downsampling_consumes_more_input() {
        // Nativa acima do host: consome mais de uma nativa por saída
        let mut rs = Resampler::new(96_000.0, 48_000.0);
        for n in 0..200 {
            rs.push(n as f32);
        }
        let avail = rs.available_output();
        assert!(avail >= 98 && avail <= 100);
        let mut out = [0.0f32; 64];
        rs.pull(&mut out);
        // Saída anda de 2 em 2 na escala de entrada
        assert!((out[1] - out[0] - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_upsampling_interpolates() {
        let mut rs = Resampler::new(24_000.0, 48_000.0);
        for n in 0..32 {
            rs.push(n as f32);
        }
        let mut out = [0.0f32; 16];
        rs.pull(&mut out);
        assert!((out[1] - 0.5).abs() < 1e-4); // meio do caminho
    }

    #[test]
    fn test_underrun_repeats_last() {
        let mut rs = Resampler::new(48_000.0, 48_000.0);
        rs.push(0.25);
        rs.push(0.75);
        let mut out = [0.0f32; 8];
        rs.pull(&mut out);
        // Duas amostras não cobrem oito saídas; o resto repete
        assert!((out[7] - out[1]).abs() < 1e-6);
    }
}
