// src/synth/mod.rs

//! O laço de agendamento de áudio: escraviza os ciclos da CPU emulada à
//! taxa de amostragem do host, entrega eventos ao firmware, pré-traduz
//! MIDI e reamostra a saída nativa para o bloco do host.

pub mod resampler;

use log::{debug, warn};

use crate::dx7::{Dx7, MIDI_VOL_TAB};
use crate::io::message::{CtrlId, KEY_BASE};
use crate::io::{Message, MidiSplitter, ToGui, ToSynth};
use crate::sound::Lp1;
use resampler::Resampler;

/// Clock mestre do instrumento.
pub const MASTER_CLOCK: f64 = 9.4265e6;

/// Taxa nativa de amostragem: 4 tiques de EGS por ciclo de CPU, uma
/// amostra a cada 96 tiques (~49.096 kHz).
pub const NATIVE_RATE: f64 = (MASTER_CLOCK / 2.0 / 4.0) * 4.0 / 96.0;

/// Tamanho nominal de bloco do host.
pub const BUF_SIZE: usize = 128;

const ID_SUSTAIN: u8 = CtrlId::Sustain as u8;
const ID_PORTA: u8 = CtrlId::Porta as u8;
const ID_CARTRIDGE: u8 = CtrlId::Cartridge as u8;
const ID_PROTECT: u8 = CtrlId::Protect as u8;
const ID_VOLUME: u8 = CtrlId::Volume as u8;
const ID_SEND_STATE: u8 = CtrlId::SendState as u8;
const ID_CARTRIDGE_FILE: u8 = CtrlId::CartridgeFile as u8;
const ID_CARTRIDGE_NUM: u8 = CtrlId::CartridgeNum as u8;

/// O sintetizador completo visto pelo host de áudio.
pub struct Synth {
    pub dx7: Dx7,

    // Filas de comunicação (sem bloqueio)
    to_synth: ToSynth,
    to_gui: ToGui,

    fs: f64,
    cyc_count: f64,
    resampler: Resampler,

    /// Slider de volume mestre (curva aplicada na mensagem).
    volume: f32,
    /// Pedal de expressão (controle MIDI 11), somado ao DAC de volume.
    midi_expression: f32,
    midi_vol_filter: Lp1,

    midi_velocity: [u8; 128],
    splitter: MidiSplitter,
    /// MIDI cru pela serial emulada, sem a pré-tradução.
    serial_midi: bool,
}

impl Synth {
    pub fn new(dx7: Dx7) -> Self {
        let mut synth = Self {
            dx7,
            to_synth: ToSynth::new(),
            to_gui: ToGui::new(),
            fs: 48_000.0,
            cyc_count: 0.0,
            resampler: Resampler::new(NATIVE_RATE, 48_000.0),
            volume: 2f32.powf(0.75) - 1.0, // casa com o slider inicial da GUI
            midi_expression: 0.0,
            midi_vol_filter: Lp1::new(1.0),
            midi_velocity: [0; 128],
            splitter: MidiSplitter::new(),
            serial_midi: false,
        };
        synth.set_midi_velocity(0.4);
        synth.set_sample_rate(48_000.0);
        synth
    }

    /// Lado da interface: empurra eventos para o sintetizador.
    pub fn to_synth(&self) -> ToSynth {
        self.to_synth.clone()
    }

    /// Lado da interface: drena as mensagens do sintetizador.
    pub fn to_gui(&self) -> ToGui {
        self.to_gui.clone()
    }

    pub fn start(&mut self) {
        let ts = self.to_synth.clone();
        self.dx7.start(&ts);
    }

    pub fn set_sample_rate(&mut self, fs: f64) {
        debug!("taxa de amostragem = {fs}");
        self.fs = fs;
        self.resampler.set_rates(NATIVE_RATE, fs);
        // Suavização analógica de 10 Hz do DAC de volume
        self.midi_vol_filter.set_f((10.6 / fs) as f32);
    }

    /// Usa a serial emulada para todo o MIDI em vez da pré-tradução.
    pub fn use_serial_midi(&mut self, on: bool) {
        self.serial_midi = on;
    }

    /// Curva de velocidade por lei de potência (c < 1 convexa, c > 1
    /// côncava, 1.0 linear).
    pub fn set_midi_velocity(&mut self, c: f32) {
        let c = if !(0.25..=4.0).contains(&c) { 1.0 } else { c };
        for (n, v) in self.midi_velocity.iter_mut().enumerate() {
            *v = (127.0 * (n as f32 / 127.0).powf(c) + 0.5) as u8;
        }
    }

    /// Ciclos de CPU que um bloco de `n` amostras do host representa.
    fn cpu_cycles_per_buf(&self, n: usize) -> f64 {
        n as f64 * ((MASTER_CLOCK / 2.0) / 4.0) / self.fs
    }

    /// Produz exatamente `out.len()` amostras na taxa do host.
    pub fn render(&mut self, out: &mut [f32]) {
        self.cyc_count += self.cpu_cycles_per_buf(out.len());
        while self.cyc_count > 0.0 {
            self.step_once();
        }
        // O orçamento de ciclos é fracionário; completa o que faltar para
        // fechar o bloco do host
        while self.resampler.available_output() < out.len() {
            self.step_once();
        }
        self.resampler.pull(out);

        // Volume MIDI: 8 níveis de referência do DAC suavizados a 10 Hz,
        // mais o pedal de expressão em 128 níveis. O epsilon protege de
        // denormais no filtro.
        let mut mv = MIDI_VOL_TAB[self.dx7.midi_volume as usize] + self.midi_expression + 1e-18;
        if mv > 1.0 {
            mv = 1.0;
        }
        for s in out.iter_mut() {
            *s *= self.volume * self.midi_vol_filter.operate(mv);
        }
    }

    /// Uma instrução da CPU e os tiques de EGS/OPS correspondentes.
    fn step_once(&mut self) {
        if self.dx7.ready() {
            if let Some(msg) = self.to_synth.pop() {
                self.process_message(msg);
            }
        }

        let step = self.dx7.run(&self.to_gui);
        // O trap de opcode ilegal não declara ciclos; queima um para o
        // tempo continuar andando
        let cycles = step.cycles.max(1) as u32;

        let mut buf = [0.0f32; 4];
        let mut count = 0;
        {
            let Dx7 { cpu, egs, .. } = &mut self.dx7;
            egs.clock(cpu.egs_aperture(), &mut buf, &mut count, 4 * cycles);
        }
        for s in &buf[..count] {
            self.resampler.push(*s);
        }

        self.cyc_count -= cycles as f64;
    }

    /// Trata as mensagens da interface, entregando à CPU as que o
    /// hardware resolvia no sub-CPU.
    fn process_message(&mut self, mut msg: Message) {
        match msg.byte1 {
            ID_VOLUME => {
                self.volume = 2f32.powf(msg.byte2 as f32 / 127.0) - 1.0;
            }

            ID_SUSTAIN => self.dx7.sustain(msg.byte2 != 0),
            ID_PORTA => self.dx7.porta(msg.byte2 != 0),

            ID_CARTRIDGE => self.dx7.set_cart_present(msg.byte2 != 0),
            ID_PROTECT => self.dx7.set_cart_write_protect(msg.byte2 != 0),

            ID_CARTRIDGE_FILE => {
                let len = msg.byte2 as usize;
                let mut name = [0u8; 255];
                if self.to_synth.chan.read_binary(&mut name, len) {
                    let path =
                        std::path::PathBuf::from(String::from_utf8_lossy(&name[..len]).into_owned());
                    if let Err(e) = self.dx7.cart_load(&path, &self.to_gui) {
                        warn!("carga de cartucho falhou: {e:#}");
                    }
                } else {
                    warn!("nome de cartucho truncado na fila");
                }
            }

            ID_CARTRIDGE_NUM => self.dx7.set_bank(msg.byte2, true, &self.to_gui),

            ID_SEND_STATE => {
                let state = self.dx7.lcd.save();
                self.to_gui.lcd_state(&state);
                self.to_gui
                    .led1_setval(self.dx7.cpu.memory[crate::dx7::P_LED1 as usize]);
                self.to_gui
                    .led2_setval(self.dx7.cpu.memory[crate::dx7::P_LED2 as usize]);
                if let Some(n) = self.dx7.cart_num() {
                    self.to_gui.cartridge_num(n);
                } else if let Some(path) = self.dx7.cart_file() {
                    let name = path.to_string_lossy().into_owned();
                    self.to_gui.cartridge_name(name.as_bytes());
                }
            }

            // Entrega ao firmware via aperto de mão
            _ => {
                // A velocidade interna do teclado é invertida: o hardware
                // conta o tempo entre a quebra e o fecho do contato, e 0 é
                // solta de tecla
                if msg.is_key_event() && msg.byte2 != 0 {
                    msg.byte2 = 128 - msg.byte2;
                }
                self.dx7.hand_off(msg);
            }
        }
    }

    /// MIDI de entrada: pré-traduz o que o sub-CPU resolvia; o resto segue
    /// para a serial emulada.
    pub fn queue_midi_rx(&mut self, buffer: &[u8]) {
        if self.serial_midi || !self.parse_midi(buffer) {
            for &b in buffer {
                self.dx7.midi_serial_rx.write(b);
            }
        }
    }

    /// SysEx vai sempre pela serial emulada.
    pub fn queue_sysex(&mut self, buffer: &[u8]) {
        for &b in buffer {
            self.dx7.midi_serial_rx.write(b);
        }
    }

    /// Devolve true quando a mensagem foi resolvida aqui; false pede o
    /// encaminhamento para a serial.
    fn parse_midi(&mut self, buffer: &[u8]) -> bool {
        if buffer.is_empty() || buffer.len() > 3 {
            return false;
        }
        let chan = buffer[0] & 0xF;
        if chan != self.dx7.midi_rx_channel() {
            return false;
        }
        match buffer[0] & 0xF0 {
            0x80 => {
                if buffer[1] >= 36 {
                    self.to_synth.key_off(buffer[1] - 36);
                }
                true
            }
            0x90 => {
                if buffer[1] >= 36 {
                    let vel = self.midi_velocity[(buffer[2] & 0x7F) as usize];
                    self.to_synth.key_on(buffer[1] - 36, vel);
                }
                true
            }
            0xB0 => match buffer[1] {
                // Controle 0 (banco MSB) dispara um bug de reset no
                // firmware nativo: morre aqui
                0 => true,
                1 => {
                    self.to_synth.analog(CtrlId::Modulate, buffer[2]);
                    true
                }
                2 => {
                    self.to_synth.analog(CtrlId::Breath, buffer[2]);
                    true
                }
                4 => {
                    self.to_synth.analog(CtrlId::Foot, buffer[2]);
                    true
                }
                6 => {
                    self.to_synth.analog(CtrlId::Data, buffer[2]);
                    true
                }
                // Controle 7 segue para a serial: é o volume de 3 bits do
                // DAC original
                7 => false,
                // Controle 11 como volume "liso" em 128 níveis, aditivo ao 7
                11 => {
                    self.midi_expression = buffer[2] as f32 / 127.0;
                    true
                }
                // Troca de banco: carrega cartucho de fábrica 0-7
                32 => {
                    self.dx7.set_bank(buffer[2] % 8, true, &self.to_gui);
                    true
                }
                64 => {
                    self.to_synth.analog(CtrlId::Sustain, buffer[2]);
                    true
                }
                65 => {
                    self.to_synth.analog(CtrlId::Porta, buffer[2]);
                    true
                }
                // Liga o modo "limpo" (sem o modelo do DAC)
                98 => {
                    self.dx7.egs.set_clean(buffer[2] != 0);
                    true
                }
                // All notes off: contorna vozes presas que o firmware não
                // solta sozinho, e ainda segue para a serial
                123 => {
                    warn!("all notes off");
                    for key in 0..61 {
                        self.to_synth.key_off(key);
                    }
                    false
                }
                _ => false,
            },
            // Pressão de canal
            0xD0 => {
                self.to_synth.analog(CtrlId::Aftertouch, buffer[1]);
                true
            }
            // Pitch bend, só o MSB
            0xE0 => {
                self.to_synth.analog(CtrlId::PitchBend, buffer[2]);
                true
            }
            _ => false,
        }
    }

    /// Fatia o fluxo MIDI transmitido pela CPU em eventos completos para o
    /// host.
    pub fn next_midi_tx(&mut self) -> Option<&[u8]> {
        self.splitter.next_event(&mut self.dx7.midi_serial_tx)
    }
}
