use core::{future::poll_fn, task::Poll};

/// Make the current task yield once, so that other futures polled by the same
/// task get the opportunity to make progress.
pub async fn yield_now() {
    let mut has_yielded = false;
    poll_fn(move |cx| {
        if has_yielded {
            Poll::Ready(())
        } else {
            // Make sure we get polled again soon
            cx.waker().wake_by_ref();
            has_yielded = true;
            Poll::Pending
        }
    })
    .await
}
