use rand::RngCore;
use std::{
    iter::Cycle,
    vec::IntoIter,
};

pub struct MockRng {
    cycle: Cycle<IntoIter<u8>>,
}

impl MockRng {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        let cycle = data.into()
            .into_iter()
            .cycle();
        Self { cycle }
    }

    pub fn next(&mut self) -> u8 {
        self.cycle
            .next()
            .unwrap_or(0)
    }
}

impl Default for MockRng {
    // the cycle length is not a multiple of the 16 byte token width,
    // so consecutively generated tokens differ
    fn default() -> Self {
        Self::new([
            0x3e, 0xd1, 0x4c, 0x08, 0xa9, 0x55, 0x6f, 0x21,
            0x07, 0xc2, 0x88, 0x9e, 0x4b, 0xd3, 0x10, 0x5a,
            0xe6,
        ])
    }
}

impl RngCore for MockRng {
    fn next_u32(&mut self) -> u32 {
        u32::from(self.next()) << 24 |
        u32::from(self.next()) << 16 |
        u32::from(self.next()) << 8 |
        u32::from(self.next())
    }

    fn next_u64(&mut self) -> u64 {
        u64::from(self.next_u32()) << 32 |
        u64::from(self.next_u32())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.iter_mut()
            .for_each(|x| *x = self.next())
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;
    use super::*;

    #[test]
    fn smoke() {
        let mut rng = MockRng::new("0");
        assert_eq!(rng.gen::<i8>(), 48);
        assert_eq!(rng.gen::<i64>(), 3472328296227680304);
        assert_eq!(rng.gen::<i128>(), 64053151420411946063694043751862251568);

        let mut slice: [u8; 3] = [0, 0, 0];
        rng.try_fill_bytes(slice.as_mut_slice())
            .expect("infallable");
        assert_eq!(slice, [48, 48, 48]);

        let mut zero = MockRng::new("");
        assert_eq!(zero.gen::<i64>(), 0);
    }

    #[test]
    fn default_cycle() {
        let mut rng = MockRng::default();
        assert_eq!(rng.gen::<u64>(), 0x3ed14c08a9556f21);
        assert_eq!(rng.gen::<u64>(), 0x07c2889e4bd3105a);
        // the 17 byte cycle has wrapped around at this point
        assert_eq!(rng.gen::<u64>(), 0xe63ed14c08a9556f);
    }
}
