#![cfg(feature = "fits")]

use std::error::Error;
use std::io::{BufReader, BufWriter, Cursor};

use astro_rs::fits::*;

#[test]
fn hdu_list_write_read_round_trip() -> Result<(), Box<dyn Error>> {
    let mut hdu_list = HduList::default();
    hdu_list.push(primary_hdu::default());
    hdu_list.push(image_hdu::default());

    let mut writer = BufWriter::new(Cursor::new(Vec::new()));
    hdu_list.write(&mut writer)?;
    let bytes = writer.into_inner()?.into_inner();

    let mut read_back = HduList::new(BufReader::new(Cursor::new(bytes)));
    assert_eq!(read_back.iter_mut().count(), 2);

    Ok(())
}

#[test]
fn primary_and_image_headers_are_valid() -> Result<(), Box<dyn Error>> {
    let mut hdu_list = HduList::default();
    hdu_list.push(primary_hdu::default());
    hdu_list.push(image_hdu::default());

    assert!(hdu_list.is_header_valid()?);
    Ok(())
}

#[test]
fn get_by_name_finds_extname() {
    let mut hdu_list = HduList::default();
    hdu_list.push(primary_hdu::default());

    let mut named = image_hdu::default();
    let name_card = FitsHeaderCard::from(
        *b"EXTNAME = 'SCI     '                                                            ",
    );
    let insert_at = named.header.cards.len() - 1;
    named.header.cards.insert(insert_at, name_card);
    hdu_list.push(named);

    let found = hdu_list.get_by_name("SCI").expect("named HDU present");
    assert_eq!(found.get_name(), "SCI");
    assert!(hdu_list.get_by_name("NOPE").is_none());
}

#[test]
fn set_and_get_card_round_trips() -> Result<(), Box<dyn Error>> {
    let mut header = FitsHeader::new();
    header.set_card(SIMPLE_KEYWORD, true, Some(String::from("conforms")))?;
    header.set_card(BITPIX_KEYWORD, Bitpix::F64, None)?;

    assert!(*header.get_card(SIMPLE_KEYWORD).unwrap().get_value::<bool>()?);
    assert_eq!(
        *header.get_card(BITPIX_KEYWORD).unwrap().get_value::<Bitpix>()?,
        Bitpix::F64
    );

    header.set_value(SIMPLE_KEYWORD, false)?;
    assert!(!*header.get_card(SIMPLE_KEYWORD).unwrap().get_value::<bool>()?);

    Ok(())
}

#[cfg(feature = "wcs")]
#[test]
fn fits_keyword_source_feeds_wcs_init() {
    use astro_rs::wcs::{FitsKeywordSource, KeywordSource, Wcs};

    let mut header = FitsHeader::new();
    header.set_card(*b"NAXIS   ", 2i64, None).unwrap();
    header.set_card(*b"NAXIS1  ", 64i64, None).unwrap();
    header.set_card(*b"NAXIS2  ", 64i64, None).unwrap();
    header.set_card(*b"CTYPE1  ", String::from("RA---TAN"), None).unwrap();
    header.set_card(*b"CTYPE2  ", String::from("DEC--TAN"), None).unwrap();
    header.set_card(*b"CRPIX1  ", 32.5, None).unwrap();
    header.set_card(*b"CRPIX2  ", 32.5, None).unwrap();
    header.set_card(*b"CRVAL1  ", 10.0, None).unwrap();
    header.set_card(*b"CRVAL2  ", -20.0, None).unwrap();
    header.set_card(*b"CDELT1  ", -0.01, None).unwrap();
    header.set_card(*b"CDELT2  ", 0.01, None).unwrap();

    let source = FitsKeywordSource::new(header);
    assert!(source.has("NAXIS1"));
    assert_eq!(source.get_int("NAXIS1"), Some(64));

    let wcs = Wcs::init(&source).expect("well-formed keyword source initializes");
    let center = wcs.center().expect("center is inside a TAN projection");
    assert!((center.longitude_deg - 10.0).abs() < 1e-9);
    assert!((center.latitude_deg - (-20.0)).abs() < 1e-9);
}
