use std::io::Cursor;
use std::time::Duration;

use image::{GrayImage, ImageFormat, Luma};
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;

use ticket_printer::{
    LogoSource, PrinterConfig, RASTER_OPCODE, RasterBlock, TicketEncoder, TicketFields,
    print_copies,
};

fn logo_png() -> Vec<u8> {
    // 21 columns: the rightmost 5 are cropped away
    let mut img = GrayImage::from_pixel(21, 6, Luma([255]));
    for y in 0..6 {
        img.put_pixel(0, y, Luma([10]));
    }
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn fields() -> TicketFields {
    TicketFields {
        producto: "SOYA".into(),
        fecha: "15/03/2024".into(),
        boleta: "2250011".into(),
        cliente: "Molinos del Bajío".into(),
        destino: "SILO 3".into(),
        placas: "JAL-4521".into(),
        vehiculo: "TORTON".into(),
        chofer: "Pedro Núñez".into(),
    }
}

#[test]
fn prebuilt_logo_file_matches_inline_image() {
    let inline = LogoSource::from_bytes(logo_png())
        .unwrap()
        .resolve(384)
        .unwrap()
        .unwrap();
    assert_eq!(inline.width_bytes(), 2);
    assert_eq!(inline.height(), 6);
    assert_eq!(&inline.data()[..2], &[0x80, 0x00]);

    // What convert-logo writes, read back as a prebuilt block
    let file_bytes = inline.to_bytes();
    let prebuilt = LogoSource::from_bytes(file_bytes).unwrap();
    assert_eq!(prebuilt, LogoSource::Prebuilt(inline.clone()));

    let encoder = TicketEncoder::new();
    let a = encoder.build(&fields(), Some(&inline));
    let b = encoder.build(&fields(), prebuilt.resolve(384).unwrap().as_ref());
    assert_eq!(a, b);
}

#[test]
fn ticket_embeds_logo_once() {
    let logo = RasterBlock::from_bytes(&[0x1D, 0x76, 0x30, 0x00, 1, 0, 2, 0, 0xAA, 0x55]).unwrap();
    let data = TicketEncoder::new().build(&fields(), Some(&logo));

    let hits = data
        .windows(RASTER_OPCODE.len())
        .filter(|w| *w == RASTER_OPCODE)
        .count();
    assert_eq!(hits, 1);
    assert!(data.windows(5).any(|w| w == b"N\xA3\xA4ez"));
    assert!(data.windows(5).any(|w| w == b"Baj\xA1o"));
}

#[tokio::test]
async fn network_printer_receives_every_copy() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = tokio::spawn(async move {
        let mut jobs = Vec::new();
        for _ in 0..2 {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut job = Vec::new();
            socket.read_to_end(&mut job).await.unwrap();
            jobs.push(job);
        }
        jobs
    });

    let data = TicketEncoder::new().build(&fields(), None);
    let printer = PrinterConfig::network("127.0.0.1", port).build().unwrap();
    print_copies(&printer, &data, 2, Duration::from_millis(5))
        .await
        .unwrap();

    let jobs = server.await.unwrap();
    assert_eq!(jobs, vec![data.clone(), data]);
}
