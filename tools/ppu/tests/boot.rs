use snes_console::boot::{BootScript, BootStep, boot};
use snes_console::{
    BootState, ColorPair, Conflict, Console, Error, FontBinding, GlyphHeight, HardwareError, Rgb15,
    SNES_FONT, VramLayout,
};
use snes_ppu::{Ppu, SCREEN_HEIGHT, SCREEN_WIDTH, render, text_runs};

const YELLOW_ON_BLACK: ColorPair = ColorPair::new(Rgb15::YELLOW, Rgb15::BLACK);

#[test]
fn hello_shows_two_yellow_runs() {
    let script = BootScript::hello();
    let mut console = boot(Ppu::new(), &script).unwrap();
    console.idle_for(2).unwrap();
    assert_eq!(console.state(), BootState::Idling);

    let ppu = console.hw();
    assert!(ppu.display_enabled());

    let runs = text_runs(ppu, &script.font, &script.layout);
    let found: Vec<_> = runs.iter().map(|r| (r.col, r.row, r.text.as_str())).collect();
    assert_eq!(found, [(5, 10, "Hello World!"), (3, 12, "PVSnesLib Test!")]);
    assert!(runs.iter().all(|r| r.colors == YELLOW_ON_BLACK));
}

#[test]
fn hello_renders_yellow_glyph_pixels() {
    let console = boot(Ppu::new(), &BootScript::hello()).unwrap();
    let frame = render(console.hw());

    // "Hello World!" covers map rows 10-11, pixels 80..96, columns 5..17
    let mut yellow = 0;
    for y in 0..SCREEN_HEIGHT {
        for x in 0..SCREEN_WIDTH {
            let pixel = frame.pixel(x, y);
            if pixel == Rgb15::YELLOW {
                yellow += 1;
                let in_hello = (80..96).contains(&y) && (40..136).contains(&x);
                let in_test = (96..112).contains(&y) && (24..144).contains(&x);
                assert!(in_hello || in_test, "stray yellow pixel at ({x}, {y})");
            } else {
                assert_eq!(pixel, Rgb15::BLACK);
            }
        }
    }
    assert!(yellow > 0);
}

#[test]
fn color_change_is_not_retroactive() {
    let red = ColorPair::new(Rgb15::new(31, 0, 0), Rgb15::BLACK);
    let steps = [
        BootStep::Color(YELLOW_ON_BLACK),
        BootStep::Draw { col: 0, row: 0, text: "A" },
        BootStep::Color(red),
        BootStep::Draw { col: 0, row: 4, text: "B" },
    ];
    let script = BootScript { steps: &steps, ..BootScript::hello() };
    let console = boot(Ppu::new(), &script).unwrap();

    let runs = text_runs(console.hw(), &script.font, &script.layout);
    assert_eq!(runs.len(), 2);
    assert_eq!((runs[0].text.as_str(), runs[0].colors), ("A", YELLOW_ON_BLACK));
    assert_eq!((runs[1].text.as_str(), runs[1].colors), ("B", red));
}

#[test]
fn nothing_visible_before_display_enable() {
    let mut console = Console::init(Ppu::new()).unwrap();
    console.init_text(FontBinding::new(0, GlyphHeight::Tall, &SNES_FONT)).unwrap();
    console.set_text_color(YELLOW_ON_BLACK).unwrap();
    console.draw_text(5, 10, "Hello World!").unwrap();
    assert!(!console.hw().display_enabled());
    assert!(render(console.hw()).is_blank());

    console.set_screen_on().unwrap();
    assert!(!render(console.hw()).is_blank());
}

#[test]
fn idling_changes_no_state() {
    let mut console = boot(Ppu::new(), &BootScript::hello()).unwrap();
    console.enter_idle().unwrap();

    let vram = console.hw().vram().to_vec();
    let cgram = *console.hw().cgram_all();
    let registers = *console.hw().registers();

    console.idle_for(60).unwrap();
    let ppu = console.hw();
    assert_eq!(ppu.frames(), 60);
    assert_eq!(ppu.vram(), &vram[..]);
    assert_eq!(ppu.cgram_all(), &cgram);
    assert_eq!(ppu.registers(), &registers);

    assert!(matches!(
        console.draw_text(0, 0, "late"),
        Err(Error::OutOfOrder { op: "draw_text", state: BootState::Idling })
    ));
}

#[test]
fn overlapping_layout_is_rejected_before_upload() {
    let script = BootScript {
        layout: VramLayout::new(0x3800, 0x3000, 0x0100),
        ..BootScript::hello()
    };
    let mut ppu = Ppu::new();
    let result = boot(&mut ppu, &script);
    assert!(matches!(
        result,
        Err(Error::ConfigurationConflict(Conflict::Overlap { .. }))
    ));
    assert!(ppu.vram().iter().all(|w| *w == 0));
}

#[test]
fn disconnected_ppu_fails_boot() {
    assert!(matches!(
        boot(Ppu::disconnected(), &BootScript::hello()),
        Err(Error::HardwareUnavailable(HardwareError::NotResponding))
    ));
}

#[test]
fn map_over_blank_tile_is_rejected() {
    let script = BootScript {
        layout: VramLayout::new(0x3000, 0x3000, 0x0100),
        ..BootScript::hello()
    };
    let mut ppu = Ppu::new();
    let result = boot(&mut ppu, &script);
    assert!(matches!(
        result,
        Err(Error::ConfigurationConflict(Conflict::BlankTile { .. }))
    ));
    assert!(ppu.vram().iter().all(|w| *w == 0));
}
