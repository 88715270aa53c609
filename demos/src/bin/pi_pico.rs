#![no_std]
#![no_main]

use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;
use fugit::RateExtU32;
use hal::pac;
use mcp4728_codec::{Channel, Error, PowerDownMode, Target, MAX_VALUE, MCP4728};
use panic_halt as _;
use rp2040_hal as hal;
use rp2040_hal::Clock;
use rp_pico::entry;
const XTAL_FREQ_HZ: u32 = 12_000_000u32;

/// Polls until the EEPROM write in progress has completed, giving up after `max_polls` attempts.
///
/// Returns true if the device became ready in time.
fn wait_for_eeprom<I, E>(
    dac: &mut MCP4728<I>,
    delay: &mut cortex_m::delay::Delay,
    max_polls: u32,
) -> Result<bool, Error<E>>
where
    I: I2c<Error = E>,
{
    for _ in 0..max_polls {
        if !dac.eeprom_busy()? {
            return Ok(true);
        }
        delay.delay_ms(1);
    }
    Ok(false)
}

#[entry]
fn main() -> ! {
    // Device-specific setup for Raspberry Pi Pico.
    let mut pac = pac::Peripherals::take().unwrap();
    let core = pac::CorePeripherals::take().unwrap();
    let mut watchdog = hal::Watchdog::new(pac.WATCHDOG);
    let clocks = hal::clocks::init_clocks_and_plls(
        XTAL_FREQ_HZ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    let mut delay = cortex_m::delay::Delay::new(core.SYST, clocks.system_clock.freq().to_Hz());
    let sio = hal::Sio::new(pac.SIO);
    let pins = rp_pico::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let mut led_pin = pins.led.into_push_pull_output();

    let sda_pin = pins
        .gpio4
        .into_function::<hal::gpio::FunctionI2C>()
        .into_pull_type::<hal::gpio::PullUp>();
    let scl_pin = pins
        .gpio5
        .into_function::<hal::gpio::FunctionI2C>()
        .into_pull_type::<hal::gpio::PullUp>();

    let i2c = hal::I2C::i2c0(
        pac.I2C0,
        sda_pin,
        scl_pin,
        400.kHz(),
        &mut pac.RESETS,
        &clocks.peripheral_clock,
    );

    let mut dac = MCP4728::new(i2c, 0x60).unwrap();

    // A channel powered down in EEPROM stays dark after every reset until this is cleared.
    if dac.read_power_down_mode(Target::Eeprom).unwrap() != PowerDownMode::Normal {
        dac.write_power_down_mode(Target::Eeprom, PowerDownMode::Normal)
            .unwrap();
        // The LED stays on if the EEPROM never reports ready.
        led_pin.set_high().unwrap();
        while !wait_for_eeprom(&mut dac, &mut delay, 100).unwrap() {}
        led_pin.set_low().unwrap();
    }

    dac.write_raw_output(MAX_VALUE, Target::Volatile).unwrap();

    // Slow sawtooth on channel A.
    let mut value = MAX_VALUE;
    loop {
        value = if value == 0 { MAX_VALUE } else { value - 1 };
        dac.write_channel_raw(Channel::A, value).unwrap();
        if value == 0 {
            led_pin.set_high().unwrap();
        } else if value == MAX_VALUE / 2 {
            led_pin.set_low().unwrap();
        }
        delay.delay_ms(100);
    }
}
