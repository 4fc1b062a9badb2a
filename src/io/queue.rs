// src/io/queue.rs

//! Fila circular de produtor único e consumidor único, sem locks.
//!
//! Os índices de cabeça e cauda são atômicos com ordenação release na
//! escrita e acquire na leitura; nenhum mutex ou CAS é necessário. A
//! capacidade é potência de dois para trocar o módulo por máscara.
//!
//! Contrato: apenas UMA thread chama `push` (a produtora) e apenas UMA
//! chama `pop` (a consumidora). Os dois lados podem rodar ao mesmo tempo.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fila SPSC de capacidade `N` (potência de dois; um slot fica reservado
/// para distinguir cheia de vazia).
pub struct SpscQueue<T, const N: usize> {
    buffer: Box<[UnsafeCell<T>]>,
    /// Posição de escrita, só a produtora avança.
    tail: AtomicUsize,
    /// Posição de leitura, só a consumidora avança.
    head: AtomicUsize,
}

// Os valores cruzam a fronteira de thread, então T: Send. O contrato SPSC
// garante que cada índice tem um único escritor e a ordenação
// release/acquire publica o conteúdo do slot junto com o índice.
unsafe impl<T: Send, const N: usize> Sync for SpscQueue<T, N> {}
unsafe impl<T: Send, const N: usize> Send for SpscQueue<T, N> {}

impl<T: Copy + Default, const N: usize> SpscQueue<T, N> {
    pub fn new() -> Self {
        assert!(N >= 2 && N.is_power_of_two());
        let buffer = (0..N)
            .map(|_| UnsafeCell::new(T::default()))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            buffer,
            tail: AtomicUsize::new(0),
            head: AtomicUsize::new(0),
        }
    }

    /// Lado produtor. Devolve false com a fila cheia (o evento é perdido e
    /// cabe ao chamador diagnosticar).
    pub fn push(&self, item: T) -> bool {
        let tail = self.tail.load(Ordering::Relaxed);
        let next = (tail + 1) & (N - 1);
        if next == self.head.load(Ordering::Acquire) {
            return false;
        }
        // Único produtor: o slot em `tail` não está visível ao consumidor
        unsafe {
            *self.buffer[tail].get() = item;
        }
        self.tail.store(next, Ordering::Release);
        true
    }

    /// Lado consumidor.
    pub fn pop(&self) -> Option<T> {
        let head = self.head.load(Ordering::Relaxed);
        if head == self.tail.load(Ordering::Acquire) {
            return None;
        }
        // Único consumidor: o slot em `head` já foi publicado pelo produtor
        let item = unsafe { *self.buffer[head].get() };
        self.head.store((head + 1) & (N - 1), Ordering::Release);
        Some(item)
    }

    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        (tail + N - head) & (N - 1)
    }
}

impl<T: Copy + Default, const N: usize> Default for SpscQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_push_pop_fifo() {
        let q: SpscQueue<u16, 8> = SpscQueue::new();
        assert!(q.is_empty());
        for v in 0..5u16 {
            assert!(q.push(v));
        }
        assert_eq!(q.len(), 5);
        for v in 0..5u16 {
            assert_eq!(q.pop(), Some(v));
        }
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn test_full_queue_rejects() {
        let q: SpscQueue<u16, 4> = SpscQueue::new(); // 3 slots úteis
        assert!(q.push(1));
        assert!(q.push(2));
        assert!(q.push(3));
        assert!(!q.push(4));
        assert_eq!(q.pop(), Some(1));
        assert!(q.push(4));
    }

    #[test]
    fn test_wraparound() {
        let q: SpscQueue<u16, 4> = SpscQueue::new();
        for round in 0..20u16 {
            assert!(q.push(round));
            assert!(q.push(round + 100));
            assert_eq!(q.pop(), Some(round));
            assert_eq!(q.pop(), Some(round + 100));
        }
        assert!(q.is_empty());
    }

    #[test]
    fn test_two_threads() {
        let q: Arc<SpscQueue<u32, 1024>> = Arc::new(SpscQueue::new());
        let producer = q.clone();
        let handle = std::thread::spawn(move || {
            for v in 0..100_000u32 {
                while !producer.push(v) {
                    std::thread::yield_now();
                }
            }
        });
        let mut expected = 0u32;
        while expected < 100_000 {
            if let Some(v) = q.pop() {
                assert_eq!(v, expected);
                expected += 1;
            }
        }
        handle.join().unwrap();
    }
}
