use binex_frame::{
    ByteSink, Corruption, FrameConfig, Receiver, RxStatus, Transmitter, TxStatus,
    DEFAULT_BUFFER_CAPACITY,
};

const START: u8 = 0xF5;
const ESC: u8 = 0xF4;

struct Lcg(u64);

impl Lcg {
    fn next_byte(&mut self) -> u8 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u8
    }

    fn bytes(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| self.next_byte()).collect()
    }
}

fn transmit(cfg: &FrameConfig, payload: &[u8]) -> Vec<u8> {
    let mut tx = Transmitter::new(cfg).expect("config should be valid");
    tx.start(payload).expect("payload should fit");
    let mut wire = Vec::new();
    assert_eq!(tx.step(&mut wire), TxStatus::Done);
    wire
}

fn receive(rx: &mut Receiver, wire: &[u8]) -> Vec<RxStatus> {
    wire.iter()
        .map(|&b| rx.feed(Some(b)))
        .filter(|s| *s != RxStatus::NotReady)
        .collect()
}

#[test]
fn round_trip_every_length_up_to_capacity() {
    let mut rng = Lcg(7);
    for checksum in [true, false] {
        let cfg = FrameConfig::default().with_checksum(checksum);
        for len in 0..=DEFAULT_BUFFER_CAPACITY {
            let payload = rng.bytes(len);
            let wire = transmit(&cfg, &payload);

            let mut rx = Receiver::new(cfg.clone()).unwrap();
            assert_eq!(receive(&mut rx, &wire), vec![RxStatus::Complete], "len {len}");
            assert_eq!(usize::from(rx.received_length()), len);
            assert_eq!(rx.payload(), payload.as_slice());
        }
    }
}

#[test]
fn reserved_only_payloads_round_trip() {
    let cfg = FrameConfig::default();
    for len in [1usize, 2, 3, 64, DEFAULT_BUFFER_CAPACITY] {
        let payload: Vec<u8> = (0..len)
            .map(|i| if i % 3 == 0 { START } else { ESC })
            .collect();
        let wire = transmit(&cfg, &payload);
        let escaped: Vec<u8> = payload.iter().flat_map(|&b| [ESC, b]).collect();
        assert_eq!(&wire[3..3 + 2 * len], escaped.as_slice());

        let mut rx = Receiver::new(cfg.clone()).unwrap();
        assert_eq!(receive(&mut rx, &wire), vec![RxStatus::Complete]);
        assert_eq!(rx.payload(), payload.as_slice());
    }
}

struct DeclineOnce {
    calls: usize,
    decline_at: usize,
    declined: bool,
    wire: Vec<u8>,
}

impl ByteSink for DeclineOnce {
    fn try_send(&mut self, byte: u8) -> bool {
        let call = self.calls;
        self.calls += 1;
        if !self.declined && call == self.decline_at {
            self.declined = true;
            return false;
        }
        self.wire.push(byte);
        true
    }
}

#[test]
fn declining_once_at_every_boundary_preserves_wire_bytes() {
    let cfg = FrameConfig::default();
    let payload = [0x00, START, 0x41, ESC, ESC, START, 0xF6, 0xFF];
    let reference = transmit(&cfg, &payload);

    for decline_at in 0..reference.len() {
        let mut tx = Transmitter::new(&cfg).unwrap();
        tx.start(&payload).unwrap();
        let mut sink = DeclineOnce {
            calls: 0,
            decline_at,
            declined: false,
            wire: Vec::new(),
        };

        let mut steps = 0;
        while tx.step(&mut sink) == TxStatus::NotDone {
            steps += 1;
            assert!(steps < 4, "transmitter stalled at boundary {decline_at}");
        }

        assert!(sink.declined);
        assert_eq!(sink.wire, reference, "boundary {decline_at}");
    }
}

#[test]
fn single_bit_flips_never_complete() {
    let cfg = FrameConfig::default();
    let payloads: [&[u8]; 4] = [
        &[0x10, 0x21, 0x32, 0x43, 0x54, 0x65, 0x06, 0x17],
        // one bit away from a start or escape symbol
        &[0xF7, 0xF6, 0xE5, 0xB4, 0xF0, 0xD5, 0x74, 0xFC],
        &[ESC, START, 0xF7, 0xF1, 0xE4, 0xB5, 0x75, 0xFD],
        // an empty frame hides behind 0xF7 -> START
        &[0xF7, 0x00, 0x00, 0x0F, 0x1D],
    ];

    for payload in payloads {
        let wire = transmit(&cfg, payload);
        for pos in 1..wire.len() {
            for bit in 0..8 {
                let mut flipped = wire.clone();
                flipped[pos] ^= 1 << bit;

                let mut rx = Receiver::new(cfg.clone()).unwrap();
                let statuses = receive(&mut rx, &flipped);
                assert!(
                    !statuses.contains(&RxStatus::Complete),
                    "{payload:02x?} pos {pos} bit {bit}: {statuses:?}"
                );
            }
        }
    }
}

#[test]
fn payload_bit_flips_are_checksum_mismatches() {
    let cfg = FrameConfig::default();
    // No byte here is one bit away from a start or escape symbol.
    let payload = [0x10, 0x21, 0x32, 0x43, 0x54, 0x65, 0x06, 0x17];
    let wire = transmit(&cfg, &payload);
    assert_eq!(&wire[..3], &[START, 0x08, 0x00]);

    for pos in 3..3 + payload.len() {
        for bit in 0..8 {
            let mut flipped = wire.clone();
            flipped[pos] ^= 1 << bit;

            let mut rx = Receiver::new(cfg.clone()).unwrap();
            assert!(matches!(
                receive(&mut rx, &flipped).as_slice(),
                [RxStatus::Corrupt(Corruption::ChecksumMismatch { .. })]
            ));
        }
    }
}

#[test]
fn declared_length_over_capacity_is_corrupt() {
    let cfg = FrameConfig::default();
    let mut rx = Receiver::new(cfg.clone()).unwrap();
    let over = (DEFAULT_BUFFER_CAPACITY + 1) as u16;
    let [lo, hi] = over.to_le_bytes();

    assert_eq!(
        receive(&mut rx, &[START, lo, hi]),
        vec![RxStatus::Corrupt(Corruption::OversizedPacket {
            declared: over,
            capacity: DEFAULT_BUFFER_CAPACITY
        })]
    );
    assert!(rx.is_idle());
    assert_eq!(rx.capacity(), DEFAULT_BUFFER_CAPACITY);

    // the would-be payload is ignored as noise
    assert!(receive(&mut rx, &vec![0x55; DEFAULT_BUFFER_CAPACITY + 1]).is_empty());

    let wire = transmit(&cfg, b"after");
    assert_eq!(receive(&mut rx, &wire), vec![RxStatus::Complete]);
    assert_eq!(rx.payload(), b"after");
}

const CRAFTED_NOISE: [u8; 15] = [
    0x00, START, 0x03, 0x00, 0x11, ESC, 0x99, ESC, ESC, START, 0xFF, 0xFF, 0x42, START, 0x05,
];

#[test]
fn crafted_noise_before_frame_is_survived() {
    let cfg = FrameConfig::default();
    // stop before the burst opens its last header
    let mut stream = CRAFTED_NOISE[..13].to_vec();
    stream.extend_from_slice(&transmit(&cfg, b"payload"));

    let mut rx = Receiver::new(cfg).unwrap();
    assert_eq!(
        receive(&mut rx, &stream),
        vec![
            RxStatus::Corrupt(Corruption::FrameDesync),
            RxStatus::Corrupt(Corruption::OversizedPacket {
                declared: 0xFFFF,
                capacity: DEFAULT_BUFFER_CAPACITY
            }),
            RxStatus::Complete,
        ]
    );
    assert_eq!(rx.payload(), b"payload");
}

#[test]
fn noise_ending_in_open_header_costs_one_frame() {
    let cfg = FrameConfig::default();
    let frame = transmit(&cfg, b"payload");
    let mut stream = CRAFTED_NOISE.to_vec();
    stream.extend_from_slice(&frame);
    stream.extend_from_slice(&frame);

    let mut rx = Receiver::new(cfg).unwrap();
    assert_eq!(
        receive(&mut rx, &stream),
        vec![
            RxStatus::Corrupt(Corruption::FrameDesync),
            RxStatus::Corrupt(Corruption::OversizedPacket {
                declared: 0xFFFF,
                capacity: DEFAULT_BUFFER_CAPACITY
            }),
            // the first copy's start lands inside the open header
            RxStatus::Corrupt(Corruption::FrameDesync),
            RxStatus::Complete,
        ]
    );
    assert_eq!(rx.payload(), b"payload");
}

#[test]
fn random_noise_before_frame_is_survived() {
    let cfg = FrameConfig::default();
    let mut rng = Lcg(0xB1E5);
    let payload = rng.bytes(40);
    let frame = transmit(&cfg, &payload);

    for burst in 0..200 {
        let len = usize::from(rng.next_byte());
        let mut stream = rng.bytes(len);
        // biased toward control symbols
        for b in stream.iter_mut() {
            match *b % 4 {
                0 => *b = START,
                1 => *b = ESC,
                _ => {}
            }
        }
        // close any dangling escape so the real start is not swallowed
        stream.push(0x00);
        // a burst may leave a header open, which costs the first copy
        stream.extend_from_slice(&frame);
        stream.extend_from_slice(&frame);

        let mut rx = Receiver::new(cfg.clone()).unwrap();
        let statuses = receive(&mut rx, &stream);
        assert_eq!(statuses.last(), Some(&RxStatus::Complete), "burst {burst}");
        assert_eq!(rx.payload(), payload.as_slice(), "burst {burst}");
    }
}

#[test]
fn single_start_byte_payload_scenario() {
    let cfg = FrameConfig::default()
        .with_buffer_capacity(192)
        .with_symbols(0xF5, 0xF4)
        .with_checksum(true);

    let wire = transmit(&cfg, &[0xF5]);
    assert_eq!(wire, vec![0xF5, 0x01, 0x00, 0xF4, 0xF5, 0x16, 0x44]);

    let mut rx = Receiver::new(cfg).unwrap();
    assert_eq!(receive(&mut rx, &wire), vec![RxStatus::Complete]);
    assert_eq!(rx.received_length(), 1);
    assert_eq!(rx.payload(), &[0xF5]);
}

#[test]
fn checksum_free_receiver_accepts_checksummed_stream() {
    let sender = FrameConfig::default();
    let receiver = FrameConfig::default().with_checksum(false);

    let payloads: [&[u8]; 3] = [b"one", &[START, ESC], b""];
    let mut stream = Vec::new();
    for payload in payloads {
        stream.extend_from_slice(&transmit(&sender, payload));
    }

    let mut rx = Receiver::new(receiver).unwrap();
    let mut received = Vec::new();
    for &b in &stream {
        if rx.feed(Some(b)) == RxStatus::Complete {
            received.push(rx.payload().to_vec());
        }
    }
    assert_eq!(received, vec![b"one".to_vec(), vec![START, ESC], vec![]]);
}

#[test]
fn independent_sessions_do_not_interfere() {
    let cfg = FrameConfig::default();
    let a = transmit(&cfg, b"alpha");
    let b = transmit(&cfg, b"bravo-bravo");

    let mut rx_a = Receiver::new(cfg.clone()).unwrap();
    let mut rx_b = Receiver::new(cfg).unwrap();
    let mut done = (false, false);
    for i in 0..a.len().max(b.len()) {
        if rx_a.feed(a.get(i).copied()) == RxStatus::Complete {
            done.0 = true;
        }
        if rx_b.feed(b.get(i).copied()) == RxStatus::Complete {
            done.1 = true;
        }
    }

    assert_eq!(done, (true, true));
    assert_eq!(rx_a.payload(), b"alpha");
    assert_eq!(rx_b.payload(), b"bravo-bravo");
}
