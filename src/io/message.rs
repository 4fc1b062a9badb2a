// src/io/message.rs

//! Vocabulário de mensagens entre a interface e o sintetizador.
//!
//! Cada mensagem ocupa uma palavra de 16 bits na fila: um byte de
//! identificação e um byte de carga. Cargas binárias maiores (nomes de
//! arquivo, estado do LCD) seguem como uma palavra de cabeçalho com o
//! comprimento e depois pares de bytes.

use std::sync::Arc;

use log::warn;

use super::queue::SpscQueue;

/// Identificadores de mensagem (byte 1).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum CtrlId {
    // Botões do painel frontal, 0-41
    B1 = 0,
    B2,
    B3,
    B4,
    B5,
    B6,
    B7,
    B8,
    B9,
    B10,
    B11,
    B12,
    B13,
    B14,
    B15,
    B16,
    B17,
    B18,
    B19,
    B20,
    B21,
    B22,
    B23,
    B24,
    B25,
    B26,
    B27,
    B28,
    B29,
    B30,
    B31,
    B32,
    BW,
    BX,
    BY,
    BZ,
    BChr,
    BDash,
    BDot,
    BSp,
    BNo,
    BYes,

    // Pedais
    Sustain = 42,
    Porta = 43,

    // Cartucho e proteção de memória
    Cartridge = 44,
    Protect = 45,

    // Slider de volume mestre
    Volume = 46,

    // Pedido de reenvio do estado do display
    SendState = 47,
    CartridgeFile = 48,

    None = 49,

    // Fontes analógicas
    Data = 144,
    PitchBend = 145,
    Modulate = 146,
    Foot = 147,
    Breath = 148,
    Aftertouch = 149,
    Battery = 150,

    // Eventos de botão
    ButtonDown = 152,
    ButtonUp = 153,

    // 159-219: teclas (payload 0 = solta, 1 = máximo ... 127 = mínimo)

    // Interface do sintetizador para a GUI
    LcdInst = 230,
    LcdData = 231,
    Led1SetVal = 232,
    Led2SetVal = 233,
    CartridgeNum = 234,
    CartridgeName = 235, // payload = comprimento do binário que segue
    LcdState = 236,      // payload = comprimento do binário que segue
}

/// Identificador da primeira tecla; notas 0-60 somam a partir daqui.
pub const KEY_BASE: u8 = 159;
pub const KEY_COUNT: u8 = 61;

/// Uma palavra de evento na fila.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Message {
    pub byte1: u8,
    pub byte2: u8,
}

impl Message {
    pub fn new(byte1: u8, byte2: u8) -> Self {
        Self { byte1, byte2 }
    }

    pub fn ctrl(id: CtrlId, data: u8) -> Self {
        Self {
            byte1: id as u8,
            byte2: data,
        }
    }

    /// Identificadores acima do fim da faixa de botões são eventos de tecla.
    pub fn is_key_event(&self) -> bool {
        self.byte1 >= KEY_BASE && self.byte1 < KEY_BASE + KEY_COUNT
    }
}

/// Fila de 1024 palavras por sentido, como no hardware de comunicação.
pub type MessageQueue = SpscQueue<Message, 1024>;

/// Canal base: um lado empurra, o outro drena. O protocolo binário vive
/// aqui porque os dois sentidos o usam.
#[derive(Clone)]
pub struct Channel {
    queue: Arc<MessageQueue>,
}

impl Default for Channel {
    fn default() -> Self {
        Self::new()
    }
}

impl Channel {
    pub fn new() -> Self {
        Self {
            queue: Arc::new(MessageQueue::new()),
        }
    }

    pub fn push(&self, m: Message) {
        if !self.queue.push(m) {
            warn!(
                "fila de eventos cheia, mensagem {:02X}:{:02X} descartada",
                m.byte1, m.byte2
            );
        }
    }

    pub fn pop(&self) -> Option<Message> {
        self.queue.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Envia o comprimento seguido de pares de bytes.
    pub fn send_binary(&self, id: CtrlId, data: &[u8]) {
        let len = data.len().min(255) as u8;
        self.push(Message::ctrl(id, len));
        let mut chunks = data[..len as usize].chunks_exact(2);
        for pair in chunks.by_ref() {
            self.push(Message::new(pair[0], pair[1]));
        }
        if let [last] = chunks.remainder() {
            self.push(Message::new(*last, 0));
        }
    }

    /// Drena um binário de `len` bytes anunciado por um cabeçalho. Devolve
    /// false se a fila esvaziar antes da conta.
    pub fn read_binary(&self, data: &mut [u8], len: usize) -> bool {
        let mut taken = 0;
        while taken < len {
            let Some(m) = self.pop() else {
                return false;
            };
            data[taken] = m.byte1;
            taken += 1;
            if taken < len {
                data[taken] = m.byte2;
                taken += 1;
            }
        }
        true
    }
}

/// Sentido interface -> sintetizador, com os construtores de evento.
#[derive(Clone, Default)]
pub struct ToSynth {
    pub chan: Channel,
}

impl ToSynth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_on(&self, key: u8, vel: u8) {
        if key < KEY_COUNT {
            self.chan.push(Message::new(KEY_BASE + key, vel));
        }
    }

    pub fn key_off(&self, key: u8) {
        if key < KEY_COUNT {
            self.chan.push(Message::new(KEY_BASE + key, 0));
        }
    }

    pub fn button_down(&self, button: CtrlId) {
        self.chan
            .push(Message::ctrl(CtrlId::ButtonDown, button as u8 + 80));
    }

    pub fn button_up(&self, button: CtrlId) {
        self.chan
            .push(Message::ctrl(CtrlId::ButtonUp, button as u8 + 80));
    }

    pub fn analog(&self, source: CtrlId, val: u8) {
        self.chan.push(Message::ctrl(source, val));
    }

    pub fn sustain(&self, down: bool) {
        self.chan.push(Message::ctrl(CtrlId::Sustain, down as u8));
    }

    pub fn porta(&self, down: bool) {
        self.chan.push(Message::ctrl(CtrlId::Porta, down as u8));
    }

    pub fn cartridge(&self, present: bool) {
        self.chan
            .push(Message::ctrl(CtrlId::Cartridge, present as u8));
    }

    pub fn protect(&self, on: bool) {
        self.chan.push(Message::ctrl(CtrlId::Protect, on as u8));
    }

    pub fn cartridge_file(&self, name: &[u8]) {
        self.chan.send_binary(CtrlId::CartridgeFile, name);
    }

    pub fn load_cartridge_num(&self, n: u8) {
        self.chan.push(Message::ctrl(CtrlId::CartridgeNum, n));
    }

    pub fn request_state(&self) {
        self.chan.push(Message::ctrl(CtrlId::SendState, 0));
    }

    pub fn pop(&self) -> Option<Message> {
        self.chan.pop()
    }
}

/// Sentido sintetizador -> interface.
#[derive(Clone, Default)]
pub struct ToGui {
    pub chan: Channel,
}

impl ToGui {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lcd_inst(&self, v: u8) {
        self.chan.push(Message::ctrl(CtrlId::LcdInst, v));
    }

    pub fn lcd_data(&self, v: u8) {
        self.chan.push(Message::ctrl(CtrlId::LcdData, v));
    }

    pub fn led1_setval(&self, v: u8) {
        self.chan.push(Message::ctrl(CtrlId::Led1SetVal, v));
    }

    pub fn led2_setval(&self, v: u8) {
        self.chan.push(Message::ctrl(CtrlId::Led2SetVal, v));
    }

    pub fn cartridge_num(&self, v: u8) {
        self.chan.push(Message::ctrl(CtrlId::CartridgeNum, v));
    }

    pub fn cartridge_name(&self, name: &[u8]) {
        self.chan.send_binary(CtrlId::CartridgeName, name);
    }

    pub fn lcd_state(&self, state: &[u8]) {
        self.chan.send_binary(CtrlId::LcdState, state);
    }

    pub fn pop(&self) -> Option<Message> {
        self.chan.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_events() {
        let ts = ToSynth::new();
        ts.key_on(24, 64);
        ts.key_off(24);
        ts.key_on(99, 64); // fora do teclado, ignorada

        let m = ts.pop().unwrap();
        assert_eq!(m.byte1, KEY_BASE + 24);
        assert_eq!(m.byte2, 64);
        assert!(m.is_key_event());

        let m = ts.pop().unwrap();
        assert_eq!(m.byte2, 0); // key-off é payload zero
        assert_eq!(ts.pop(), None);
    }

    #[test]
    fn test_button_offset() {
        let ts = ToSynth::new();
        ts.button_down(CtrlId::BYes);
        let m = ts.pop().unwrap();
        assert_eq!(m.byte1, CtrlId::ButtonDown as u8);
        assert_eq!(m.byte2, CtrlId::BYes as u8 + 80);
    }

    #[test]
    fn test_binary_roundtrip_even_and_odd() {
        for payload in [&b"ROM1A.SYX"[..], &b"CART.SYX"[..]] {
            let tg = ToGui::new();
            tg.cartridge_name(payload);

            let header = tg.pop().unwrap();
            assert_eq!(header.byte1, CtrlId::CartridgeName as u8);
            let len = header.byte2 as usize;
            assert_eq!(len, payload.len());

            let mut buf = vec![0u8; len];
            assert!(tg.chan.read_binary(&mut buf, len));
            assert_eq!(&buf, payload);
            assert!(tg.chan.is_empty());
        }
    }

    #[test]
    fn test_read_binary_underrun() {
        let tg = ToGui::new();
        tg.chan.push(Message::new(1, 2));
        let mut buf = [0u8; 6];
        assert!(!tg.chan.read_binary(&mut buf, 6));
    }
}
