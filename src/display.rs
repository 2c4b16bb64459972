//! ST7789 panel bring-up: 320×170 LCD over SPI with DMA, plus its backlight.

use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::{
    Async,
    dma::{
        DmaRxBuf,
        DmaTxBuf,
    },
    dma_buffers,
    gpio::{
        Level,
        Output,
        OutputConfig,
    },
    spi::master::Spi,
    time::Rate,
};
use static_cell::ConstStaticCell;

use crate::{
    BacklightResources,
    DisplayResources,
    config::{
        H,
        W,
    },
};

type SpiInterface<'a> = mipidsi::interface::SpiInterface<'a, SpiDevice<'a>, Output<'a>>;

/// The badge's ST7789 panel. Frames are flipped onto it whole.
pub type Display<'a> = mipidsi::Display<SpiInterface<'a>, mipidsi::models::ST7789, Output<'a>>;

/// SPI clock for the panel. A full 320×170 frame is ~109 kB, so this bounds
/// the flip time at roughly 11 ms.
const SPI_CLOCK_MHZ: u32 = 80;

/// Command/pixel staging buffer for the mipidsi SPI interface.
static SPI_STAGING: ConstStaticCell<[u8; 32000]> = ConstStaticCell::new([0; 32000]);

type SpiDevice<'a> =
    ExclusiveDevice<esp_hal::spi::master::SpiDmaBus<'a, Async>, Output<'a>, esp_hal::delay::Delay>;

/// SPI bus + chip select, plus the DC and (released) reset pins.
fn spi_device(
    res: DisplayResources<'static>,
    delay: esp_hal::delay::Delay,
) -> (SpiDevice<'static>, Output<'static>, Output<'static>) {
    let (rx_buffer, rx_descriptors, tx_buffer, tx_descriptors) = dma_buffers!(32000);
    let dma_rx_buf = DmaRxBuf::new(rx_descriptors, rx_buffer).unwrap();
    let dma_tx_buf = DmaTxBuf::new(tx_descriptors, tx_buffer).unwrap();

    let dc = Output::new(res.dc, Level::Low, OutputConfig::default());
    let mut rst = Output::new(res.rst, Level::Low, OutputConfig::default());
    rst.set_high();

    let bus = Spi::new(
        res.spi,
        esp_hal::spi::master::Config::default().with_frequency(Rate::from_mhz(SPI_CLOCK_MHZ)),
    )
    .unwrap()
    .with_sck(res.sck)
    .with_mosi(res.mosi)
    .with_miso(res.miso)
    .with_dma(res.dma)
    .with_buffers(dma_rx_buf, dma_tx_buf)
    .into_async();

    let cs = Output::new(res.cs, Level::High, OutputConfig::default());
    (ExclusiveDevice::new(bus, cs, delay).unwrap(), dc, rst)
}

impl From<DisplayResources<'static>> for Display<'static> {
    fn from(res: DisplayResources<'static>) -> Self {
        let mut delay = esp_hal::delay::Delay::new();
        let (device, dc, rst) = spi_device(res, delay);
        let di = mipidsi::interface::SpiInterface::new(device, dc, SPI_STAGING.take());

        // Native panel is portrait; rotate so the field is W wide and H tall.
        mipidsi::Builder::new(mipidsi::models::ST7789, di)
            .reset_pin(rst)
            .display_size(H as u16, W as u16)
            .invert_colors(mipidsi::options::ColorInversion::Inverted)
            .orientation(
                mipidsi::options::Orientation::new().rotate(mipidsi::options::Rotation::Deg90),
            )
            .display_offset(35, 0)
            .init(&mut delay)
            .unwrap()
    }
}

/// Switch the backlight on. Keep the returned pin alive for as long as the
/// screen should stay lit.
pub fn backlight_on(res: BacklightResources<'static>) -> Output<'static> {
    Output::new(res.led, Level::High, OutputConfig::default())
}
