// src/dx7/mod.rs

//! A máquina completa: CPU, EGS/OPS, display, periféricos mapeados em
//! memória, o aperto de mão de eventos do sub-CPU e os arquivos
//! persistentes (firmware, cartucho, RAM de bateria).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bitflags::bitflags;
use log::{debug, info, warn};

use crate::cpu::core::{Trcsr, PORT1, PORT2, TRCSR};
use crate::cpu::{Hd6303, Step};
use crate::io::message::CtrlId;
use crate::io::{ByteFifo, Message, ToGui, ToSynth};
use crate::lcd::Hd44780;
use crate::memory::firmware::VOICES_SIZE;
use crate::memory::{battery, cartridge, firmware, VoiceRom, BATTERY_SIZE, CART_SIZE};
use crate::sound::Egs;

// Espaço de periféricos, mapeado em 0x2800-0x280F
pub const P_LCD_DATA: u16 = 0x2800;
pub const P_LCD_CTRL: u16 = 0x2801;
pub const P_CRT_PEDALS_LCD: u16 = 0x2802;
pub const P_OPS_MODE: u16 = 0x2804;
pub const P_OPS_ALG_FDBK: u16 = 0x2805;
pub const P_DAC: u16 = 0x280A;
pub const P_ACEPT: u16 = 0x280C;
pub const P_LED1: u16 = 0x280E;
pub const P_LED2: u16 = 0x280F;

// Endereços que dependem do layout do firmware publicado
const M_MASTER_TUNE: usize = 0x2311;
const M_MASTER_TUNE_LOW: usize = 0x2312;
const M_MIDI_RX_CH: usize = 0x2573;

// Bases dos segmentos persistentes
const RAM_BASE: u16 = 0x1000;
const CART_BASE: u16 = 0x4000;
const ROM_BASE: u16 = 0xC000;

/// Taxa do baud serial: ((9.4265 MHz / 2) / 4) / 3125 bytes/s a 31.25k.
pub const SCI_BAUD_CYCLES: u32 = 377;

/// Níveis do DAC de volume, tensões de referência do hardware.
pub const MIDI_VOL_TAB: [f32; 8] = [
    0.0,
    710.0 / 4790.0,
    200.0 / 4790.0,
    2590.0 / 4790.0,
    100.0 / 4790.0,
    1390.0 / 4790.0,
    380.0 / 4790.0,
    1.0,
];

bitflags! {
    /// Byte de estado do painel em 0x2802: pedais, cartucho e LCD ocupado.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PanelStatus: u8 {
        const SUSTAIN      = 1 << 0;
        const PORTA        = 1 << 1;
        const CART_ABSENT  = 1 << 5;
        const CART_PROTECT = 1 << 6;
        const LCD_BUSY     = 1 << 7;
    }
}

/// Emulação do hardware do instrumento.
pub struct Dx7 {
    pub cpu: Hd6303,
    pub egs: Egs,
    pub lcd: Hd44780,

    // Buffers seriais MIDI
    pub midi_serial_rx: ByteFifo,
    pub midi_serial_tx: ByteFifo,

    /// Índice no DAC de volume (0-7).
    pub midi_volume: u8,

    // Aperto de mão de eventos do sub-CPU
    msg: Message,
    have_msg: bool,
    byte1_sent: bool,

    // Cartucho
    save_cart: bool,
    cart_file: Option<PathBuf>,
    cart_num: Option<u8>,

    ram_file: Option<PathBuf>,
    voices: Option<VoiceRom>,
}

impl Dx7 {
    pub fn new(ram_file: Option<PathBuf>) -> Self {
        let mut dx7 = Self {
            cpu: Hd6303::new(),
            egs: Egs::new(),
            lcd: Hd44780::new(),
            midi_serial_rx: ByteFifo::new(),
            midi_serial_tx: ByteFifo::new(),
            midi_volume: 7,
            msg: Message::default(),
            have_msg: false,
            byte1_sent: false,
            save_cart: false,
            cart_file: None,
            cart_num: None,
            ram_file,
            voices: None,
        };
        Egs::power_on(dx7.egs_aperture_mut());
        dx7
    }

    fn egs_aperture_mut(&mut self) -> &mut [u8; 256] {
        (&mut self.cpu.memory[0x3000..0x3100]).try_into().unwrap()
    }

    /// Carrega a ROM de firmware em 0xC000. Falha aqui é fatal na partida.
    pub fn load_rom(&mut self, path: &Path) -> Result<()> {
        let rom = firmware::load_firmware(path)
            .with_context(|| format!("firmware {}", path.display()))?;
        self.cpu.load_segment(ROM_BASE, &rom);
        Ok(())
    }

    /// Firmware já em memória (por exemplo embutido pelo host).
    pub fn load_rom_bytes(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() != firmware::FIRMWARE_SIZE {
            anyhow::bail!("tamanho de firmware inválido: {}", rom.len());
        }
        self.cpu.load_segment(ROM_BASE, rom);
        Ok(())
    }

    /// Blob com os oito bancos de vozes de fábrica.
    pub fn load_voices(&mut self, path: &Path) -> Result<()> {
        self.voices = Some(VoiceRom::load(path).with_context(|| format!("vozes {}", path.display()))?);
        Ok(())
    }

    pub fn load_voices_bytes(&mut self, data: Vec<u8>) -> Result<()> {
        if data.len() != VOICES_SIZE {
            anyhow::bail!("tamanho de blob de vozes inválido: {}", data.len());
        }
        self.voices = Some(VoiceRom::from_bytes(data)?);
        Ok(())
    }

    /// Liga o instrumento: restaura a RAM de bateria, arma o estado do
    /// painel e dispara o reset da CPU.
    pub fn start(&mut self, to_synth: &ToSynth) {
        // Tensão de bateria "baixa" (~1.9 V) até a RAM restaurar
        to_synth.analog(CtrlId::Battery, 49);

        match self.restore_ram() {
            Ok(true) => {
                info!("RAM restaurada");
                // Tensão de bateria "boa" (~3.2 V)
                to_synth.analog(CtrlId::Battery, 82);
            }
            Ok(false) | Err(_) => {
                // Sem RAM: zera e assume afinação padrão A440
                for addr in 0..BATTERY_SIZE {
                    self.cpu.memory[RAM_BASE as usize + addr] = 0;
                }
                self.tune(0);
            }
        }

        self.cpu.memory[P_CRT_PEDALS_LCD as usize] = 0;

        // Pedal de portamento desconectado deixa o bit 1 alto, que por
        // padrão mantém o portamento sempre ativo; o controle MIDI 65
        // passa a alternar o bit
        self.porta(true);

        self.set_cart_present(false);
        self.set_cart_write_protect(true);

        // O LCD emulado nunca fica ocupado
        self.panel_clear(PanelStatus::LCD_BUSY);

        self.cpu.reset();
    }

    fn restore_ram(&mut self) -> Result<bool> {
        let Some(path) = self.ram_file.clone() else {
            return Ok(false);
        };
        let data = match battery::load_battery_ram(&path) {
            Ok(data) => data,
            Err(e) => {
                warn!("não restaurou a RAM ({e})");
                return Ok(false);
            }
        };
        self.cpu.load_segment(RAM_BASE, &data);
        debug!(
            "master tune 0x{:01X}{:02X}",
            self.cpu.memory[M_MASTER_TUNE], self.cpu.memory[M_MASTER_TUNE_LOW]
        );
        Ok(true)
    }

    /// Descarrega os estados persistentes. Também chamada no drop.
    pub fn shutdown(&mut self) {
        if let Some(path) = self.ram_file.clone() {
            let data = self.cpu.segment(RAM_BASE, BATTERY_SIZE).to_vec();
            match battery::save_battery_ram(&path, &data) {
                Ok(()) => info!("RAM salva"),
                Err(e) => warn!("não salvou a RAM ({e})"),
            }
        }
        self.save_cart_if_dirty();
    }

    /// Afinação mestre, -256 a +255 em passos de ~0.3 cent; 0 = A440.
    pub fn tune(&mut self, tuning: i32) {
        if (-256..256).contains(&tuning) {
            let t = (tuning + 256) as u16;
            self.cpu.memory[M_MASTER_TUNE] = (t >> 8) as u8;
            self.cpu.memory[M_MASTER_TUNE_LOW] = t as u8;
        }
        debug!(
            "master tune 0x{:01X}{:02X}",
            self.cpu.memory[M_MASTER_TUNE], self.cpu.memory[M_MASTER_TUNE_LOW]
        );
    }

    pub fn midi_rx_channel(&self) -> u8 {
        self.cpu.memory[M_MIDI_RX_CH]
    }

    // Bits do painel

    fn panel_set(&mut self, f: PanelStatus) {
        self.cpu.memory[P_CRT_PEDALS_LCD as usize] |= f.bits();
    }

    fn panel_clear(&mut self, f: PanelStatus) {
        self.cpu.memory[P_CRT_PEDALS_LCD as usize] &= !f.bits();
    }

    pub fn sustain(&mut self, on: bool) {
        if on {
            self.panel_set(PanelStatus::SUSTAIN);
        } else {
            self.panel_clear(PanelStatus::SUSTAIN);
        }
    }

    pub fn porta(&mut self, on: bool) {
        if on {
            self.panel_set(PanelStatus::PORTA);
        } else {
            self.panel_clear(PanelStatus::PORTA);
        }
    }

    pub fn set_cart_present(&mut self, present: bool) {
        if present {
            self.panel_clear(PanelStatus::CART_ABSENT);
        } else {
            self.panel_set(PanelStatus::CART_ABSENT);
        }
    }

    pub fn cart_present(&self) -> bool {
        self.cpu.memory[P_CRT_PEDALS_LCD as usize] & PanelStatus::CART_ABSENT.bits() == 0
    }

    pub fn set_cart_write_protect(&mut self, protect: bool) {
        if protect {
            self.panel_set(PanelStatus::CART_PROTECT);
        } else {
            self.panel_clear(PanelStatus::CART_PROTECT);
        }
    }

    pub fn cart_write_protect(&self) -> bool {
        self.cpu.memory[P_CRT_PEDALS_LCD as usize] & PanelStatus::CART_PROTECT.bits() != 0
    }

    pub fn cart_num(&self) -> Option<u8> {
        self.cart_num
    }

    pub fn cart_file(&self) -> Option<&Path> {
        self.cart_file.as_deref()
    }

    // Aperto de mão de eventos

    /// O sintetizador entrega uma mensagem por vez; a próxima só depois do
    /// firmware consumir esta.
    pub fn hand_off(&mut self, msg: Message) {
        self.msg = msg;
        self.have_msg = true;
    }

    pub fn ready(&self) -> bool {
        !self.have_msg
    }

    /// Executa uma instrução e atualiza os periféricos.
    pub fn run(&mut self, to_gui: &ToGui) -> Step {
        let step = self.cpu.step();

        // Timer de baud da serial. O hardware real usa um clock externo
        // para chegar aos 31.25k baud do MIDI.
        if self.cpu.sci_tx_counter >= SCI_BAUD_CYCLES {
            if let Some(byte) = self.cpu.clock_out_data() {
                self.midi_serial_tx.write(byte);
            }
        }
        if self.cpu.sci_rx_counter >= SCI_BAUD_CYCLES
            && !self.midi_serial_rx.is_empty()
            && self.cpu.memory[TRCSR] & Trcsr::RDRF.bits() == 0
        {
            if let Some(byte) = self.midi_serial_rx.read() {
                self.cpu.clock_in_data(byte);
            }
        }

        // Guarda de pilha: diagnóstico, nunca falha
        if self.cpu.sp <= 0x263F && self.cpu.sp > 0 {
            warn!("pilha estourada 0x{:04X}", self.cpu.sp);
        }

        // Início do aperto de mão: P20 alto diz que a CPU principal está
        // pronta para a próxima mensagem
        if self.cpu.memory[PORT2] & 1 != 0 && self.have_msg && !self.byte1_sent {
            self.cpu.memory[PORT1] = self.msg.byte1;
            self.cpu.memory[PORT2] &= !(1 << 1); // pino 21 baixo: leia o byte
            self.cpu.irq_pin = false; // ativo baixo dispara o IRQ
            self.byte1_sent = true;
        }

        // Daqui em diante só interessam instruções que escreveram memória
        if !step.wrote {
            return step;
        }

        if step.addr & 0xFFF0 == 0x2800 {
            match step.addr {
                P_LCD_DATA => {
                    let byte = self.cpu.memory[step.addr as usize];
                    match self.cpu.memory[P_LCD_CTRL as usize] {
                        4 => {
                            to_gui.lcd_inst(byte);
                            self.lcd.inst(byte);
                        }
                        5 => {
                            to_gui.lcd_data(byte);
                            self.lcd.data(byte);
                        }
                        _ => {}
                    }
                }

                P_ACEPT => {
                    // O flipflop de aceite dispara quando 0x280C aparece no
                    // barramento: ou envia o segundo byte, ou encerra
                    if self.byte1_sent {
                        self.cpu.memory[PORT1] = self.msg.byte2;
                        self.cpu.memory[PORT2] &= !(1 << 1);
                        self.cpu.irq_pin = false; // re-dispara (mascarado no handler)
                        self.byte1_sent = false;
                    } else {
                        self.cpu.irq_pin = true; // solta a linha
                        self.have_msg = false; // pronto para outra mensagem
                    }
                }

                P_LED1 => {
                    // O firmware sempre escreve 0x280F antes de 0x280E
                    to_gui.led1_setval(self.cpu.memory[P_LED1 as usize]);
                    to_gui.led2_setval(self.cpu.memory[P_LED2 as usize]);
                }

                P_OPS_ALG_FDBK => {
                    // O firmware sempre escreve 0x2804 antes de 0x2805
                    let mode = self.cpu.memory[P_OPS_MODE as usize];
                    let alg = self.cpu.memory[P_OPS_ALG_FDBK as usize];
                    self.egs.set_algorithm(mode, alg);
                }

                P_DAC => {
                    self.midi_volume = self.cpu.memory[P_DAC as usize] & 7;
                }

                _ => {}
            }
        }

        // Escritas na janela do EGS disparam a recomputação dirigida
        if step.addr & 0xFF00 == 0x3000 {
            let Self { cpu, egs, .. } = self;
            egs.update(cpu.egs_aperture(), step.addr as u8);
        }

        // Escritas no cartucho marcam a imagem como suja
        if step.addr & 0xF000 == CART_BASE {
            self.save_cart = true;
        }

        step
    }

    /// Carrega um cartucho em formato SysEx. Erros deixam o cartucho
    /// "ausente" e nunca derrubam a thread de áudio.
    pub fn cart_load(&mut self, path: &Path, to_gui: &ToGui) -> Result<()> {
        self.save_cart_if_dirty();
        self.cart_file = None;

        let payload = cartridge::load(path).with_context(|| format!("cartucho {}", path.display()))?;
        self.cpu.load_segment(CART_BASE, &payload);

        self.cart_file = Some(path.to_path_buf());
        self.cart_num = None;
        self.set_cart_present(true);
        // Hardware nasce protegido contra escrita; a GUI segue o mesmo
        self.set_cart_write_protect(true);
        self.save_cart = false;

        let name = path.to_string_lossy();
        to_gui.cartridge_name(name.as_bytes());
        Ok(())
    }

    pub fn cart_save(&self, path: &Path) -> Result<()> {
        let payload: &[u8; CART_SIZE] = self.cpu.segment(CART_BASE, CART_SIZE).try_into().unwrap();
        cartridge::save(path, payload).with_context(|| format!("cartucho {}", path.display()))?;
        Ok(())
    }

    fn save_cart_if_dirty(&mut self) {
        if self.cart_write_protect() || !self.save_cart {
            return;
        }
        let Some(path) = self.cart_file.clone() else {
            return;
        };
        match self.cart_save(&path) {
            Ok(()) => info!("cartucho salvo ({})", path.display()),
            Err(e) => warn!("não salvou o cartucho ({e})"),
        }
        self.save_cart = false;
    }

    /// Copia um banco de fábrica para o cartucho ou para a memória
    /// interna de patches.
    pub fn set_bank(&mut self, n: u8, cart: bool, to_gui: &ToGui) {
        let Some(voices) = &self.voices else {
            warn!("blob de vozes de fábrica não carregado");
            return;
        };
        let bank = voices.bank(n).to_vec();
        if cart {
            self.save_cart_if_dirty();
            self.set_cart_present(true);
            self.cart_file = None;
            self.cart_num = Some(n & 0x7);
            self.cpu.load_segment(CART_BASE, &bank);
            to_gui.cartridge_num(n & 0x7);
        } else {
            self.cpu.load_segment(RAM_BASE, &bank);
        }
    }
}

impl Drop for Dx7 {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::core::VEC_IRQ;
    use crate::cpu::core::VEC_RESET;

    /// Máquina com um micro-firmware: CLI e laço apertado, handler de IRQ
    /// que lê PORT1 e confirma em 0x280C.
    fn micro_machine() -> Dx7 {
        let mut dx7 = Dx7::new(None);
        let mut rom = vec![0x01u8; firmware::FIRMWARE_SIZE];
        // 0xC000: CLI ; BRA -2
        rom[0x0000] = 0x0E;
        rom[0x0001] = 0x20;
        rom[0x0002] = 0xFE;
        // 0xC100: LDAA $02 ; STAA $280C ; RTI
        rom[0x0100] = 0x96;
        rom[0x0101] = 0x02;
        rom[0x0102] = 0xB7;
        rom[0x0103] = 0x28;
        rom[0x0104] = 0x0C;
        rom[0x0105] = 0x3B;
        // Vetores
        rom[(VEC_RESET - 0xC000) as usize] = 0xC0;
        rom[(VEC_RESET - 0xC000) as usize + 1] = 0x00;
        rom[(VEC_IRQ - 0xC000) as usize] = 0xC1;
        rom[(VEC_IRQ - 0xC000) as usize + 1] = 0x00;
        dx7.load_rom_bytes(&rom).unwrap();

        let ts = ToSynth::new();
        dx7.start(&ts);
        dx7.cpu.sp = 0x2700;
        dx7.cpu.memory[PORT2] |= 1; // CPU principal pronta
        dx7
    }

    #[test]
    fn test_handshake_delivers_both_bytes() {
        let mut dx7 = micro_machine();
        let tg = ToGui::new();

        dx7.hand_off(Message::new(0xAA, 0x55));
        assert!(!dx7.ready());

        // Primeiro passo arma o primeiro byte e baixa a linha de IRQ
        dx7.run(&tg);
        assert_eq!(dx7.cpu.memory[PORT1], 0xAA);
        assert!(!dx7.cpu.irq_pin);
        assert_eq!(dx7.cpu.memory[PORT2] & 2, 0);

        // O handler lê PORT1 e escreve 0x280C; o segundo byte segue
        let mut second_seen = false;
        for _ in 0..64 {
            dx7.run(&tg);
            if dx7.cpu.memory[PORT1] == 0x55 {
                second_seen = true;
            }
            if dx7.ready() {
                break;
            }
        }
        assert!(second_seen);
        assert!(dx7.ready());
        assert!(dx7.cpu.irq_pin); // linha solta no fim
    }

    #[test]
    fn test_handshake_waits_for_firmware_ready() {
        let mut dx7 = micro_machine();
        let tg = ToGui::new();
        dx7.cpu.memory[PORT2] &= !1; // firmware ocupado

        dx7.hand_off(Message::new(0x90, 0x40));
        for _ in 0..8 {
            dx7.run(&tg);
        }
        assert!(dx7.cpu.irq_pin); // nada entregue
        assert!(!dx7.ready());

        dx7.cpu.memory[PORT2] |= 1;
        dx7.run(&tg);
        assert_eq!(dx7.cpu.memory[PORT1], 0x90);
    }

    /// Roda instruções vindas de um buffer em 0xC000 via ROM sintética.
    fn machine_with_code(code: &[u8]) -> Dx7 {
        let mut dx7 = Dx7::new(None);
        let mut rom = vec![0x01u8; firmware::FIRMWARE_SIZE];
        rom[..code.len()].copy_from_slice(code);
        rom[(VEC_RESET - 0xC000) as usize] = 0xC0;
        rom[(VEC_RESET - 0xC000) as usize + 1] = 0x00;
        dx7.load_rom_bytes(&rom).unwrap();
        let ts = ToSynth::new();
        dx7.start(&ts);
        dx7.cpu.sp = 0x2700;
        dx7
    }

    #[test]
    fn test_lcd_write_dispatch() {
        // LDAA #$04 ; STAA $2801 ; LDAA #$38 ; STAA $2800 (instrução)
        // LDAA #$05 ; STAA $2801 ; LDAA #$41 ; STAA $2800 (dado 'A')
        let mut dx7 = machine_with_code(&[
            0x86, 0x04, 0xB7, 0x28, 0x01, 0x86, 0x38, 0xB7, 0x28, 0x00, 0x86, 0x05, 0xB7, 0x28,
            0x01, 0x86, 0x41, 0xB7, 0x28, 0x00,
        ]);
        let tg = ToGui::new();
        for _ in 0..8 {
            dx7.run(&tg);
        }
        assert!(dx7.lcd.lines); // function set aplicado
        assert_eq!(dx7.lcd.line1[0], b'A');

        // Os espelhos seguiram para a GUI
        let m = tg.pop().unwrap();
        assert_eq!(m.byte1, CtrlId::LcdInst as u8);
        assert_eq!(m.byte2, 0x38);
        let m = tg.pop().unwrap();
        assert_eq!(m.byte1, CtrlId::LcdData as u8);
        assert_eq!(m.byte2, 0x41);
    }

    #[test]
    fn test_led_write_dispatch() {
        // LDAA #$32 ; STAA $280F ; STAA $280E
        let mut dx7 = machine_with_code(&[0x86, 0x32, 0xB7, 0x28, 0x0F, 0xB7, 0x28, 0x0E]);
        let tg = ToGui::new();
        for _ in 0..3 {
            dx7.run(&tg);
        }
        let m = tg.pop().unwrap();
        assert_eq!(m.byte1, CtrlId::Led1SetVal as u8);
        assert_eq!(m.byte2, 0x32);
        let m = tg.pop().unwrap();
        assert_eq!(m.byte1, CtrlId::Led2SetVal as u8);
    }

    #[test]
    fn test_algorithm_write_dispatch() {
        // LDAA #$10 ; STAA $2804 ; LDAA #$FB ; STAA $2805
        // modo "todas as vozes", algoritmo 31, feedback 3
        let mut dx7 = machine_with_code(&[
            0x86, 0x10, 0xB7, 0x28, 0x04, 0x86, 0xFB, 0xB7, 0x28, 0x05,
        ]);
        let tg = ToGui::new();
        for _ in 0..4 {
            dx7.run(&tg);
        }
        assert_eq!(dx7.egs.ops.algorithm(0), 31);
        assert_eq!(dx7.egs.ops.algorithm(15), 31);
    }

    #[test]
    fn test_dac_write_sets_midi_volume() {
        // LDAA #$FD ; STAA $280A
        let mut dx7 = machine_with_code(&[0x86, 0xFD, 0xB7, 0x28, 0x0A]);
        let tg = ToGui::new();
        for _ in 0..2 {
            dx7.run(&tg);
        }
        assert_eq!(dx7.midi_volume, 5); // só os 3 bits baixos contam
    }

    #[test]
    fn test_cartridge_write_marks_dirty() {
        // LDAA #$7F ; STAA $4123
        let mut dx7 = machine_with_code(&[0x86, 0x7F, 0xB7, 0x41, 0x23]);
        let tg = ToGui::new();
        assert!(!dx7.save_cart);
        for _ in 0..2 {
            dx7.run(&tg);
        }
        assert!(dx7.save_cart);
        assert_eq!(dx7.cpu.memory[0x4123], 0x7F);
    }

    #[test]
    fn test_set_bank_targets() {
        let mut dx7 = Dx7::new(None);
        let mut blob = vec![0u8; VOICES_SIZE];
        blob[0] = 0xA1; // banco 0
        blob[4096] = 0xB2; // banco 1
        dx7.load_voices_bytes(blob).unwrap();
        let tg = ToGui::new();

        dx7.set_bank(1, true, &tg);
        assert_eq!(dx7.cpu.memory[0x4000], 0xB2);
        assert!(dx7.cart_present());
        assert_eq!(dx7.cart_num(), Some(1));
        let m = tg.pop().unwrap();
        assert_eq!(m.byte1, CtrlId::CartridgeNum as u8);
        assert_eq!(m.byte2, 1);

        dx7.set_bank(0, false, &tg);
        assert_eq!(dx7.cpu.memory[0x1000], 0xA1);
    }

    #[test]
    fn test_panel_bits() {
        let mut dx7 = Dx7::new(None);
        let ts = ToSynth::new();
        dx7.start(&ts);

        // Estado padrão da partida
        assert!(!dx7.cart_present());
        assert!(dx7.cart_write_protect());
        let panel = dx7.cpu.memory[P_CRT_PEDALS_LCD as usize];
        assert!(panel & PanelStatus::PORTA.bits() != 0);
        assert!(panel & PanelStatus::LCD_BUSY.bits() == 0);

        dx7.sustain(true);
        assert!(dx7.cpu.memory[P_CRT_PEDALS_LCD as usize] & 1 != 0);
        dx7.sustain(false);
        assert!(dx7.cpu.memory[P_CRT_PEDALS_LCD as usize] & 1 == 0);
    }

    #[test]
    fn test_tune_range() {
        let mut dx7 = Dx7::new(None);
        dx7.tune(0);
        assert_eq!(dx7.cpu.memory[M_MASTER_TUNE], 0x01);
        assert_eq!(dx7.cpu.memory[M_MASTER_TUNE_LOW], 0x00);
        dx7.tune(-256);
        assert_eq!(dx7.cpu.memory[M_MASTER_TUNE], 0x00);
        dx7.tune(255);
        assert_eq!(dx7.cpu.memory[M_MASTER_TUNE], 0x01);
        assert_eq!(dx7.cpu.memory[M_MASTER_TUNE_LOW], 0xFF);
        // Fora da faixa não escreve
        dx7.tune(300);
        assert_eq!(dx7.cpu.memory[M_MASTER_TUNE_LOW], 0xFF);
    }

    #[test]
    fn test_egs_write_dispatch() {
        // LDAA #$15 ; STAA $30F1  (voz 5, key-on)
        let mut dx7 = machine_with_code(&[0x86, 0x15, 0xB7, 0x30, 0xF1]);
        // Parâmetros audíveis para o envelope destravar
        for a in 0x3040..0x3058 {
            dx7.cpu.memory[a] = 63;
        }
        for a in 0x3060..0x3078 {
            dx7.cpu.memory[a] = 0;
        }
        for a in 0x3080..0x30E0 {
            dx7.cpu.memory[a] = 4;
        }
        for a in 0x30E0..0x30E6 {
            dx7.cpu.memory[a] = 0;
        }
        dx7.cpu.memory[0x30F0] = 0;
        let tg = ToGui::new();
        for _ in 0..2 {
            dx7.run(&tg);
        }
        assert_eq!(dx7.cpu.memory[0x30F1], 0x15);

        // A voz 5 disparou: depois de alguns quadros o envelope dela saiu
        // do repouso enquanto a voz 4 continua em silêncio
        let mut buf = [0.0f32; 16];
        let mut count = 0;
        let Dx7 { cpu, egs, .. } = &mut dx7;
        egs.clock(cpu.egs_aperture(), &mut buf, &mut count, 96 * 16);
        assert!(egs.envelope_value(0, 5) < 0xFF0);
        assert_eq!(egs.envelope_value(0, 4), 0xFF0);
    }

    #[test]
    fn test_cart_roundtrip_through_machine() {
        let path = std::env::temp_dir().join("hexop_test_machine_cart.syx");
        let mut dx7 = Dx7::new(None);
        for n in 0..CART_SIZE {
            dx7.cpu.memory[CART_BASE as usize + n] = (n % 127) as u8;
        }
        dx7.cart_save(&path).unwrap();

        let mut other = Dx7::new(None);
        let tg = ToGui::new();
        other.cart_load(&path, &tg).unwrap();
        assert_eq!(
            other.cpu.segment(CART_BASE, CART_SIZE),
            dx7.cpu.segment(CART_BASE, CART_SIZE)
        );
        assert!(other.cart_present());

        // O nome do arquivo seguiu para a GUI como binário
        let header = tg.pop().unwrap();
        assert_eq!(header.byte1, CtrlId::CartridgeName as u8);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_battery_ram_flush_on_shutdown() {
        let path = std::env::temp_dir().join("hexop_test_machine_ram.bin");
        std::fs::remove_file(&path).ok();
        {
            let mut dx7 = Dx7::new(Some(path.clone()));
            dx7.cpu.memory[0x1000] = 0x5A;
            dx7.cpu.memory[0x1000 + BATTERY_SIZE - 1] = 0xA5;
            // O drop descarrega a RAM
        }
        let data = battery::load_battery_ram(&path).unwrap();
        assert_eq!(data[0], 0x5A);
        assert_eq!(data[BATTERY_SIZE - 1], 0xA5);

        // A próxima partida restaura
        let mut dx7 = Dx7::new(Some(path.clone()));
        let ts = ToSynth::new();
        dx7.start(&ts);
        assert_eq!(dx7.cpu.memory[0x1000], 0x5A);
        // Bateria fraca e depois boa
        let m = ts.pop().unwrap();
        assert_eq!(m.byte2, 49);
        let m = ts.pop().unwrap();
        assert_eq!(m.byte2, 82);
        std::fs::remove_file(&path).ok();
    }
}
