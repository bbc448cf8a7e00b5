use core::{
    future::{poll_fn, Future},
    pin::pin,
    task::Poll,
};

/// Poll two futures on the same task until both are ready.
///
/// The first future is always polled before the second one.
pub async fn join<F1: Future, F2: Future>(f1: F1, f2: F2) -> (F1::Output, F2::Output) {
    let mut f1 = pin!(f1);
    let mut f2 = pin!(f2);
    let mut out1 = None;
    let mut out2 = None;

    poll_fn(|cx| {
        if out1.is_none() {
            if let Poll::Ready(res) = f1.as_mut().poll(cx) {
                out1 = Some(res);
            }
        }
        if out2.is_none() {
            if let Poll::Ready(res) = f2.as_mut().poll(cx) {
                out2 = Some(res);
            }
        }

        match (out1.take(), out2.take()) {
            (Some(res1), Some(res2)) => Poll::Ready((res1, res2)),
            (res1, res2) => {
                out1 = res1;
                out2 = res2;
                Poll::Pending
            }
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use core::future::poll_fn;
    use core::task::Poll;

    use pollster::FutureExt as _;

    use super::join;

    #[test]
    fn immediate_ready() {
        async {
            let f1 = poll_fn(|_| Poll::Ready(1));
            let f2 = poll_fn(|_| Poll::Ready(2));

            assert_eq!(join(f1, f2).await, (1, 2));
        }
        .block_on();
    }

    #[test]
    fn wait_until_first_finished() {
        async {
            let mut counter = 10;
            let f1 = poll_fn(move |cx| {
                if counter == 0 {
                    Poll::Ready(())
                } else {
                    counter -= 1;
                    cx.waker().wake_by_ref();
                    Poll::Pending
                }
            });
            let f2 = poll_fn(|_| Poll::Ready(()));

            assert_eq!(join(f1, f2).await, ((), ()));
        }
        .block_on();
    }

    #[test]
    fn wait_until_second_finished() {
        async {
            let mut counter = 10;
            let f1 = poll_fn(|_| Poll::Ready(()));
            let f2 = poll_fn(move |cx| {
                if counter == 0 {
                    Poll::Ready(())
                } else {
                    counter -= 1;
                    cx.waker().wake_by_ref();
                    Poll::Pending
                }
            });

            assert_eq!(join(f1, f2).await, ((), ()));
        }
        .block_on();
    }
}
