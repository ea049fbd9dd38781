//! Signals are pulled one batch at a time. The audio driver picks the batch length, so every
//! signal in a graph produces the same number of samples for a given `SigCtx`.

use std::iter;

#[derive(Clone, Copy, Debug)]
pub struct SigCtx {
    pub sample_rate_hz: f32,
    pub batch_index: u64,
    pub num_samples: usize,
}

/// One batch of samples.
pub trait Buf<T>
where
    T: Clone,
{
    fn iter(&self) -> impl Iterator<Item = T>;

    /// Replace the contents of `out` with this batch.
    fn copy_into(&self, out: &mut Vec<T>) {
        out.clear();
        out.extend(self.iter());
    }
}

impl<T> Buf<T> for &[T]
where
    T: Clone,
{
    fn iter(&self) -> impl Iterator<Item = T> {
        <[T]>::iter(self).cloned()
    }

    fn copy_into(&self, out: &mut Vec<T>) {
        out.clear();
        out.extend_from_slice(self);
    }
}

/// The same value for every sample of a batch.
pub struct ConstBuf<T> {
    pub value: T,
    pub count: usize,
}

impl<T> Buf<T> for ConstBuf<T>
where
    T: Clone,
{
    fn iter(&self) -> impl Iterator<Item = T> {
        iter::repeat(self.value.clone()).take(self.count)
    }

    fn copy_into(&self, out: &mut Vec<T>) {
        out.clear();
        out.resize(self.count, self.value.clone());
    }
}

/// A value for each audio sample. Control values like frequency and gain are signals too, so
/// they can be combined sample-by-sample with the audio they control.
pub trait SigT {
    type Item: Clone;

    fn sample(&mut self, ctx: &SigCtx) -> impl Buf<Self::Item>;
}

impl SigT for f32 {
    type Item = Self;

    fn sample(&mut self, ctx: &SigCtx) -> impl Buf<Self::Item> {
        ConstBuf {
            value: *self,
            count: ctx.num_samples,
        }
    }
}

/// Wraps a `SigT` so combinators can be called as methods.
pub struct Sig<S>(pub S)
where
    S: SigT;

impl<S: SigT> SigT for Sig<S> {
    type Item = S::Item;

    fn sample(&mut self, ctx: &SigCtx) -> impl Buf<Self::Item> {
        self.0.sample(ctx)
    }
}

impl<S> Sig<S>
where
    S: SigT,
{
    /// Sample the next batch into `out`, replacing its contents.
    pub fn sample_into_vec(&mut self, ctx: &SigCtx, out: &mut Vec<S::Item>) {
        self.0.sample(ctx).copy_into(out);
    }

    pub fn map<T, F>(self, f: F) -> Sig<Map<S, T, F>>
    where
        T: Clone,
        F: FnMut(S::Item) -> T,
    {
        Sig(Map {
            sig: self.0,
            f,
            buf: Vec::new(),
        })
    }

    pub fn zip<O>(self, other: O) -> Sig<Zip<S, O>>
    where
        O: SigT,
    {
        Sig(Zip {
            left: self.0,
            right: other,
            buf: Vec::new(),
        })
    }
}

pub struct Map<S, T, F> {
    sig: S,
    f: F,
    buf: Vec<T>,
}

impl<S, T, F> SigT for Map<S, T, F>
where
    S: SigT,
    T: Clone,
    F: FnMut(S::Item) -> T,
{
    type Item = T;

    fn sample(&mut self, ctx: &SigCtx) -> impl Buf<Self::Item> {
        let input = self.sig.sample(ctx);
        self.buf.clear();
        self.buf.extend(input.iter().map(&mut self.f));
        self.buf.as_slice()
    }
}

pub struct Zip<L, R>
where
    L: SigT,
    R: SigT,
{
    left: L,
    right: R,
    buf: Vec<(L::Item, R::Item)>,
}

impl<L, R> SigT for Zip<L, R>
where
    L: SigT,
    R: SigT,
{
    type Item = (L::Item, R::Item);

    fn sample(&mut self, ctx: &SigCtx) -> impl Buf<Self::Item> {
        let left = self.left.sample(ctx);
        let right = self.right.sample(ctx);
        self.buf.clear();
        self.buf.extend(left.iter().zip(right.iter()));
        self.buf.as_slice()
    }
}
